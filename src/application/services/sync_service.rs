use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::application::ports::{CheckinGateway, Connectivity, OutboxStore};
use crate::domain::entities::{ScanHistory, SyncReport};
use crate::shared::error::{AppError, Result};

type PassResult = Option<Result<SyncReport>>;

/// Drains the outbox against the remote endpoint whenever connectivity
/// allows: on reconnect, on a timer, or on a manual trigger.
pub struct SyncService {
    outbox: Arc<dyn OutboxStore>,
    gateway: Arc<dyn CheckinGateway>,
    connectivity: Arc<dyn Connectivity>,
    history: Arc<RwLock<ScanHistory>>,
    in_flight: Mutex<Option<watch::Receiver<PassResult>>>,
}

impl SyncService {
    pub fn new(
        outbox: Arc<dyn OutboxStore>,
        gateway: Arc<dyn CheckinGateway>,
        connectivity: Arc<dyn Connectivity>,
        history: Arc<RwLock<ScanHistory>>,
    ) -> Self {
        Self {
            outbox,
            gateway,
            connectivity,
            history,
            in_flight: Mutex::new(None),
        }
    }

    /// Run one sync pass. Concurrent callers do not start a second drain:
    /// they wait on the pass already running and receive its report.
    pub async fn sync_now(&self) -> Result<SyncReport> {
        let tx = {
            let mut slot = self.in_flight.lock().await;
            if let Some(rx) = slot.as_ref() {
                let mut rx = rx.clone();
                drop(slot);
                loop {
                    if let Some(result) = rx.borrow_and_update().clone() {
                        return result;
                    }
                    if rx.changed().await.is_err() {
                        let last = rx.borrow().clone();
                        return last.unwrap_or_else(|| {
                            Err(AppError::Internal(
                                "sync pass ended without a report".to_string(),
                            ))
                        });
                    }
                }
            }

            let (tx, rx) = watch::channel(None);
            *slot = Some(rx);
            tx
        };

        let result = self.run_pass().await;

        // Clear the slot before publishing, so a trigger arriving now starts
        // a fresh pass instead of reading this one's stale report.
        *self.in_flight.lock().await = None;
        let _ = tx.send(Some(result.clone()));
        result
    }

    /// Whether a pass is currently running ("Sync Now" stays disabled).
    pub async fn is_syncing(&self) -> bool {
        self.in_flight.lock().await.is_some()
    }

    /// Queue length for display refresh. Does not trigger any delivery.
    pub async fn queue_count(&self) -> Result<u64> {
        self.outbox.count().await
    }

    /// Re-run a sync pass on a fixed interval.
    pub fn schedule_sync(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;

                if !service.connectivity.is_online() {
                    continue;
                }
                if let Err(e) = service.sync_now().await {
                    tracing::error!("Sync error: {}", e);
                }
            }
        })
    }

    async fn run_pass(&self) -> Result<SyncReport> {
        if !self.connectivity.is_online() {
            return Ok(SyncReport::empty());
        }

        let queue = self.outbox.list().await?;
        let total = queue.len() as u32;
        let mut success = 0u32;
        let mut failed = 0u32;

        // Sequential deliveries keep the counts exact.
        for record in queue {
            match self.gateway.deliver(&record.barcode).await {
                Ok(confirmation) => {
                    self.outbox.remove(record.id).await?;
                    tracing::info!(
                        "Delivered queued check-in {}: {}",
                        record.id,
                        confirmation.label()
                    );
                    success += 1;
                }
                Err(err) => {
                    failed += 1;
                    let attempts = record.retry_count + 1;
                    tracing::warn!(
                        "Delivery of queued check-in {} failed (attempt {} of {}): {}",
                        record.id,
                        attempts,
                        record.max_retries,
                        err
                    );
                    match self.outbox.update_retry_count(record.id, attempts).await {
                        Ok(()) => {}
                        // Operator cleared the record mid-pass.
                        Err(AppError::NotFound(_)) => {}
                        Err(storage) => return Err(storage),
                    }
                }
            }
        }

        let report = SyncReport::new(success, failed, total);
        if report.total > 0 {
            self.history
                .write()
                .await
                .record(report.summary(), report.failed == 0);
        }
        Ok(report)
    }
}
