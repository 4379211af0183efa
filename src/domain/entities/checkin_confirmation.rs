use serde::{Deserialize, Serialize};

/// Remote check-in result, resolved once at the API boundary instead of
/// re-sniffing the response shape at each call site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckinConfirmation {
    Individual {
        member_name: String,
        message: Option<String>,
    },
    Family {
        member_count: u32,
        message: Option<String>,
    },
}

impl CheckinConfirmation {
    /// Operator-facing label: the server's message verbatim when present,
    /// otherwise composed from the variant.
    pub fn label(&self) -> String {
        match self {
            CheckinConfirmation::Individual {
                member_name,
                message,
            } => message
                .clone()
                .unwrap_or_else(|| format!("{member_name} checked in")),
            CheckinConfirmation::Family {
                member_count,
                message,
            } => message
                .clone()
                .unwrap_or_else(|| format!("Family check-in: {member_count} member(s)")),
        }
    }
}
