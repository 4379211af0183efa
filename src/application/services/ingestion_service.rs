use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};

use crate::application::ports::{CheckinGateway, Connectivity, DeliveryError, OutboxStore};
use crate::domain::entities::{CheckinConfirmation, ScanHistory};
use crate::domain::scanner::{KeyInput, ScanCollector};
use crate::domain::value_objects::Barcode;
use crate::shared::error::Result;

/// What a single scan turned into, for operator messaging.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The remote endpoint accepted the check-in directly.
    CheckedIn(CheckinConfirmation),
    /// The scan was durably queued for later sync. The queuing succeeded,
    /// not the check-in itself.
    Queued { pending: u64 },
    /// The endpoint definitively declined the check-in.
    Rejected { reason: String },
}

impl ScanOutcome {
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::CheckedIn(confirmation) => confirmation.label(),
            ScanOutcome::Queued { pending } => {
                format!("Offline: check-in queued for sync ({pending} pending)")
            }
            ScanOutcome::Rejected { reason } => reason.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ScanOutcome::Rejected { .. })
    }
}

/// Turns completed barcodes into either an immediate remote check-in or a
/// durable outbox entry.
pub struct IngestionService {
    outbox: Arc<dyn OutboxStore>,
    gateway: Arc<dyn CheckinGateway>,
    connectivity: Arc<dyn Connectivity>,
    history: Arc<RwLock<ScanHistory>>,
    debounce_window: Duration,
}

impl IngestionService {
    pub fn new(
        outbox: Arc<dyn OutboxStore>,
        gateway: Arc<dyn CheckinGateway>,
        connectivity: Arc<dyn Connectivity>,
        history: Arc<RwLock<ScanHistory>>,
        debounce_window: Duration,
    ) -> Self {
        Self {
            outbox,
            gateway,
            connectivity,
            history,
            debounce_window,
        }
    }

    /// Process one completed barcode. Expected conditions (offline,
    /// rejection) resolve to a [`ScanOutcome`]; only storage failures and
    /// unexpected errors propagate as `Err`.
    pub async fn ingest(&self, barcode: Barcode) -> Result<ScanOutcome> {
        let result = self.ingest_inner(barcode).await;

        let mut history = self.history.write().await;
        match &result {
            Ok(outcome) => history.record(outcome.message(), outcome.is_success()),
            Err(err) => history.record(format!("Scan failed: {err}"), false),
        }

        result
    }

    async fn ingest_inner(&self, barcode: Barcode) -> Result<ScanOutcome> {
        if !self.connectivity.is_online() {
            return self.enqueue_for_sync(barcode).await;
        }

        match self.gateway.deliver(&barcode).await {
            Ok(confirmation) => {
                tracing::info!("Checked in {}: {}", barcode, confirmation.label());
                Ok(ScanOutcome::CheckedIn(confirmation))
            }
            Err(DeliveryError::Rejected { reason }) => {
                tracing::info!("Check-in of {} rejected: {}", barcode, reason);
                Ok(ScanOutcome::Rejected { reason })
            }
            Err(DeliveryError::Network(err)) => {
                // The monitor believed we were online; the call said otherwise.
                tracing::warn!("Delivery of {} failed, queuing instead: {}", barcode, err);
                self.enqueue_for_sync(barcode).await
            }
        }
    }

    async fn enqueue_for_sync(&self, barcode: Barcode) -> Result<ScanOutcome> {
        self.outbox.enqueue(barcode).await?;
        let pending = self.outbox.count().await?;
        Ok(ScanOutcome::Queued { pending })
    }

    /// Drive the scan collector over a stream of key events until the sender
    /// side closes. Ingestions run off the loop so keystrokes keep being
    /// collected while a request is in flight; scans completed meanwhile are
    /// deferred by the collector and drained one at a time.
    pub async fn run_scanner(self: Arc<Self>, mut keys: mpsc::UnboundedReceiver<KeyInput>) {
        let mut collector = ScanCollector::new(self.debounce_window);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        loop {
            let deadline = collector.next_deadline();
            let debounce = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                key = keys.recv() => {
                    let Some(input) = key else { break };
                    if let Some(barcode) =
                        collector.handle_key(input, std::time::Instant::now())
                    {
                        self.dispatch(&mut collector, barcode, done_tx.clone());
                    }
                }
                _ = done_rx.recv() => {
                    collector.set_busy(false);
                    if let Some(barcode) = collector.pop_deferred() {
                        self.dispatch(&mut collector, barcode, done_tx.clone());
                    }
                }
                _ = debounce => {
                    if let Some(barcode) =
                        collector.poll_deadline(std::time::Instant::now())
                    {
                        self.dispatch(&mut collector, barcode, done_tx.clone());
                    }
                }
            }
        }
    }

    fn dispatch(
        self: &Arc<Self>,
        collector: &mut ScanCollector,
        barcode: Barcode,
        done: mpsc::UnboundedSender<()>,
    ) {
        collector.set_busy(true);
        let service = Arc::clone(self);
        tokio::spawn(async move {
            // Dropped on every exit path, so the collector is always released.
            let _release = BusyRelease { done };
            if let Err(err) = service.ingest(barcode).await {
                tracing::error!("Scan ingestion failed: {}", err);
            }
        });
    }
}

struct BusyRelease {
    done: mpsc::UnboundedSender<()>,
}

impl Drop for BusyRelease {
    fn drop(&mut self) {
        let _ = self.done.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SCAN_HISTORY_CAPACITY;
    use crate::infrastructure::connectivity::ConnectivityMonitor;
    use crate::infrastructure::database::{ConnectionPool, SqliteOutboxStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Gateway double answering every delivery with a fixed script.
    struct ScriptedGateway {
        response: Box<dyn Fn() -> std::result::Result<CheckinConfirmation, DeliveryError> + Send + Sync>,
        delivered: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl ScriptedGateway {
        fn new(
            response: impl Fn() -> std::result::Result<CheckinConfirmation, DeliveryError>
                + Send
                + Sync
                + 'static,
        ) -> Self {
            Self {
                response: Box::new(response),
                delivered: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn delivered(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CheckinGateway for ScriptedGateway {
        async fn deliver(
            &self,
            barcode: &Barcode,
        ) -> std::result::Result<CheckinConfirmation, DeliveryError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.delivered.lock().unwrap().push(barcode.as_str().to_string());
            (self.response)()
        }
    }

    fn individual(name: &str) -> CheckinConfirmation {
        CheckinConfirmation::Individual {
            member_name: name.to_string(),
            message: Some(format!("{name} checked in successfully!")),
        }
    }

    struct Setup {
        service: Arc<IngestionService>,
        outbox: Arc<dyn OutboxStore>,
        history: Arc<RwLock<ScanHistory>>,
        gateway: Arc<ScriptedGateway>,
    }

    async fn setup(gateway: ScriptedGateway, online: bool) -> Setup {
        let pool = ConnectionPool::in_memory().await.unwrap();
        let outbox: Arc<dyn OutboxStore> = Arc::new(SqliteOutboxStore::new(pool));
        let history = Arc::new(RwLock::new(ScanHistory::new(SCAN_HISTORY_CAPACITY)));
        let monitor = Arc::new(ConnectivityMonitor::new(online));
        let gateway = Arc::new(gateway);

        let service = Arc::new(IngestionService::new(
            outbox.clone(),
            gateway.clone(),
            monitor,
            history.clone(),
            Duration::from_millis(150),
        ));
        Setup {
            service,
            outbox,
            history,
            gateway,
        }
    }

    #[tokio::test]
    async fn offline_scan_is_queued_with_pending_total() {
        let env = setup(ScriptedGateway::new(|| Ok(individual("Maria"))), false).await;

        let outcome = env
            .service
            .ingest(Barcode::new("X1").unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Queued { pending: 1 });

        let queued = env.outbox.list().await.unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].barcode.as_str(), "X1");
        assert_eq!(queued[0].retry_count, 0);

        let recent = env.history.read().await.recent();
        assert!(recent[0].success);
        assert!(recent[0].label.contains("1 pending"));

        // No delivery was attempted while offline.
        assert!(env.gateway.delivered().is_empty());
    }

    #[tokio::test]
    async fn online_scan_checks_in_directly() {
        let env = setup(ScriptedGateway::new(|| Ok(individual("Maria"))), true).await;

        let outcome = env
            .service
            .ingest(Barcode::new("123456789012").unwrap())
            .await
            .unwrap();
        assert!(matches!(outcome, ScanOutcome::CheckedIn(_)));
        assert_eq!(env.outbox.count().await.unwrap(), 0);

        let recent = env.history.read().await.recent();
        assert!(recent[0].success);
        assert_eq!(recent[0].label, "Maria checked in successfully!");
    }

    #[tokio::test]
    async fn rejection_is_surfaced_and_never_queued() {
        let env = setup(
            ScriptedGateway::new(|| {
                Err(DeliveryError::Rejected {
                    reason: "Member not found with this barcode or email".to_string(),
                })
            }),
            true,
        )
        .await;

        let outcome = env
            .service
            .ingest(Barcode::new("999999999999").unwrap())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::Rejected {
                reason: "Member not found with this barcode or email".to_string()
            }
        );
        assert_eq!(env.outbox.count().await.unwrap(), 0);
        assert!(!env.history.read().await.recent()[0].success);
    }

    #[tokio::test]
    async fn network_failure_while_online_falls_back_to_queue() {
        let env = setup(
            ScriptedGateway::new(|| Err(DeliveryError::Network("request timed out".to_string()))),
            true,
        )
        .await;

        let outcome = env
            .service
            .ingest(Barcode::new("X2").unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Queued { pending: 1 });
        assert_eq!(env.outbox.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn scanner_loop_delivers_enter_terminated_burst() {
        let env = setup(ScriptedGateway::new(|| Ok(individual("Maria"))), true).await;

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = tokio::spawn(env.service.clone().run_scanner(rx));

        for c in ['A', 'B', 'C'] {
            tx.send(KeyInput::char(c)).unwrap();
        }
        tx.send(KeyInput::enter()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        drop(tx);
        driver.await.unwrap();

        assert_eq!(env.gateway.delivered(), vec!["ABC".to_string()]);
    }

    #[tokio::test]
    async fn scans_arriving_mid_ingestion_are_submitted_exactly_once() {
        let env = setup(
            ScriptedGateway::new(|| Ok(individual("Maria")))
                .with_delay(Duration::from_millis(80)),
            true,
        )
        .await;

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = tokio::spawn(env.service.clone().run_scanner(rx));

        // The first scan starts an ingestion; the second completes while it
        // is still in flight and must be deferred, not dropped or duplicated.
        for c in ['1', '1', '1'] {
            tx.send(KeyInput::char(c)).unwrap();
        }
        tx.send(KeyInput::enter()).unwrap();
        for c in ['2', '2', '2'] {
            tx.send(KeyInput::char(c)).unwrap();
        }
        tx.send(KeyInput::enter()).unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        drop(tx);
        driver.await.unwrap();

        assert_eq!(
            env.gateway.delivered(),
            vec!["111".to_string(), "222".to_string()]
        );
    }
}
