use serde::{Deserialize, Serialize};

/// Aggregate counts of one sync pass over the outbox.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub success: u32,
    pub failed: u32,
    pub total: u32,
}

impl SyncReport {
    pub fn new(success: u32, failed: u32, total: u32) -> Self {
        Self {
            success,
            failed,
            total,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        if self.total == 0 {
            "Nothing to sync".to_string()
        } else if self.failed == 0 {
            format!("Synced {} queued check-in(s)", self.success)
        } else {
            format!(
                "Synced {} of {} queued check-in(s), {} still pending",
                self.success, self.total, self.failed
            )
        }
    }
}
