use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Storage key of a queued check-in. Generated at enqueue time, immutable
/// for the life of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckinId(Uuid);

impl CheckinId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|err| format!("Invalid check-in id: {err}"))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CheckinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = CheckinId::generate();
        let b = CheckinId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_roundtrips_display() {
        let id = CheckinId::generate();
        let parsed = CheckinId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(CheckinId::parse("not-a-uuid").is_err());
    }
}
