use serde::Deserialize;

use crate::domain::entities::CheckinConfirmation;

/// Success body of `POST /checkin-by-barcode`. The endpoint answers with one
/// of two shapes (family vs individual); older deployments nest the member
/// name under `member.name` and omit `family_checkin` for individuals.
#[derive(Debug, Deserialize)]
pub struct CheckinResponseBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub family_checkin: Option<bool>,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub member_name: Option<String>,
    #[serde(default)]
    pub member: Option<MemberBody>,
}

#[derive(Debug, Deserialize)]
pub struct MemberBody {
    #[serde(default)]
    pub name: Option<String>,
}

/// Error body of every non-2xx answer.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl CheckinResponseBody {
    /// Resolve the duck-typed wire shape into a tagged confirmation, once,
    /// at the API boundary.
    pub fn into_confirmation(self) -> Result<CheckinConfirmation, String> {
        if self.family_checkin == Some(true) {
            let member_count = self
                .member_count
                .ok_or_else(|| "family check-in response without member_count".to_string())?;
            return Ok(CheckinConfirmation::Family {
                member_count,
                message: self.message,
            });
        }

        let member_name = self
            .member_name
            .or_else(|| self.member.and_then(|m| m.name))
            .ok_or_else(|| "check-in response without a member name".to_string())?;

        Ok(CheckinConfirmation::Individual {
            member_name,
            message: self.message,
        })
    }
}
