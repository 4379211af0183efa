use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw scanned payload: a member barcode or a shared household code.
/// Opaque beyond being non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Barcode(String);

impl Barcode {
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Barcode cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Barcode> for String {
    fn from(barcode: Barcode) -> Self {
        barcode.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let barcode = Barcode::new("  123456789012 \n").unwrap();
        assert_eq!(barcode.as_str(), "123456789012");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(Barcode::new("").is_err());
        assert!(Barcode::new("   ").is_err());
    }

    #[test]
    fn household_email_codes_are_accepted() {
        let barcode = Barcode::new("family@example.com").unwrap();
        assert_eq!(barcode.as_str(), "family@example.com");
    }
}
