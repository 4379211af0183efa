use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Operator feedback for one ingestion or sync outcome. In-memory only;
/// the durable record of unresolved work lives in the outbox, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub success: bool,
}

/// Most-recent-first feed of scan outcomes, capped at a fixed number of
/// entries.
#[derive(Debug)]
pub struct ScanHistory {
    entries: VecDeque<ScanHistoryEntry>,
    capacity: usize,
}

pub const SCAN_HISTORY_CAPACITY: usize = 10;

impl ScanHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, label: impl Into<String>, success: bool) {
        self.entries.push_front(ScanHistoryEntry {
            timestamp: Utc::now(),
            label: label.into(),
            success,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn recent(&self) -> Vec<ScanHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(SCAN_HISTORY_CAPACITY)
    }
}
