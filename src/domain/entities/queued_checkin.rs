use crate::domain::value_objects::{Barcode, CheckinId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One deferred check-in attempt, durably stored until delivered or cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedCheckin {
    pub id: CheckinId,
    pub barcode: Barcode,
    pub enqueued_at: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
}

impl QueuedCheckin {
    pub fn new(barcode: Barcode, max_retries: u32, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            id: CheckinId::generate(),
            barcode,
            enqueued_at,
            retry_count: 0,
            max_retries,
        }
    }

    /// A record that has used up its retry ceiling. It stays in the queue
    /// until an operator clears it or a delivery finally succeeds.
    pub fn is_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }
}
