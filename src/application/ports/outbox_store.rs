use crate::domain::entities::QueuedCheckin;
use crate::domain::value_objects::{Barcode, CheckinId};
use crate::shared::error::Result;
use async_trait::async_trait;

/// Durable CRUD over queued check-ins, isolated from any screen's lifetime.
///
/// Exactly two writers exist: the ingestion pipeline (`enqueue`) and the
/// sync engine (`remove` / `update_retry_count`); `clear_all` is reserved
/// for an explicit operator action.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Persist a new record with a zero retry count and return its id.
    /// A storage failure here is fatal: the caller must know the scan was
    /// not durably queued.
    async fn enqueue(&self, barcode: Barcode) -> Result<CheckinId>;

    /// All current records, in no particular order.
    async fn list(&self) -> Result<Vec<QueuedCheckin>>;

    /// Delete one record. Removing an id that no longer exists is a no-op.
    async fn remove(&self, id: CheckinId) -> Result<()>;

    /// Overwrite a record's retry count. Fails with `AppError::NotFound`
    /// when the record was cleared in the meantime.
    async fn update_retry_count(&self, id: CheckinId, retry_count: u32) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    /// Delete every record. Irreversible.
    async fn clear_all(&self) -> Result<()>;
}
