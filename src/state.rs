use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::application::ports::OutboxStore;
use crate::application::services::{IngestionService, ScanOutcome, SyncService};
use crate::domain::entities::{QueuedCheckin, ScanHistory, ScanHistoryEntry, SyncReport};
use crate::domain::scanner::KeyInput;
use crate::domain::value_objects::Barcode;
use crate::infrastructure::api::HttpCheckinGateway;
use crate::infrastructure::connectivity::ConnectivityMonitor;
use crate::infrastructure::database::{ConnectionPool, SqliteOutboxStore};
use crate::shared::config::AppConfig;
use crate::shared::error::Result;

/// Wires the scan ingestion and sync core together and exposes the narrow
/// surface the operator screens consume.
#[derive(Clone)]
pub struct AppState {
    config: AppConfig,
    connectivity: Arc<ConnectivityMonitor>,
    outbox: Arc<dyn OutboxStore>,
    history: Arc<RwLock<ScanHistory>>,
    ingestion: Arc<IngestionService>,
    sync: Arc<SyncService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let pool = ConnectionPool::open(&config.database_path).await?;
        let outbox: Arc<dyn OutboxStore> = Arc::new(
            SqliteOutboxStore::new(pool).with_max_retries(config.max_retries),
        );

        let gateway = Arc::new(HttpCheckinGateway::new(
            config.api_base_url.clone(),
            config.request_timeout,
        )?);
        let connectivity = Arc::new(ConnectivityMonitor::new(true));
        let history = Arc::new(RwLock::new(ScanHistory::default()));

        let ingestion = Arc::new(IngestionService::new(
            outbox.clone(),
            gateway.clone(),
            connectivity.clone(),
            history.clone(),
            config.debounce_window,
        ));
        let sync = Arc::new(SyncService::new(
            outbox.clone(),
            gateway,
            connectivity.clone(),
            history.clone(),
        ));

        // Regained connectivity drains the backlog without operator action.
        let on_reconnect = sync.clone();
        let _ = connectivity.on_online(move || {
            let sync = on_reconnect.clone();
            async move {
                if let Err(err) = sync.sync_now().await {
                    tracing::error!("Sync after reconnect failed: {}", err);
                }
            }
        });

        let _ = sync.schedule_sync(config.sync_interval);

        Ok(Self {
            config,
            connectivity,
            outbox,
            history,
            ingestion,
            sync,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Start a scanner session. Key events pushed into the returned sender
    /// are collected into barcodes and ingested; the session ends when the
    /// sender is dropped.
    pub fn spawn_scanner(&self) -> mpsc::UnboundedSender<KeyInput> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.ingestion.clone().run_scanner(rx));
        tx
    }

    /// Ingest one already-assembled barcode, for shells that do their own
    /// key handling.
    pub async fn ingest(&self, barcode: Barcode) -> Result<ScanOutcome> {
        self.ingestion.ingest(barcode).await
    }

    pub async fn sync_now(&self) -> Result<SyncReport> {
        self.sync.sync_now().await
    }

    pub async fn is_syncing(&self) -> bool {
        self.sync.is_syncing().await
    }

    pub async fn queued_checkins(&self) -> Result<Vec<QueuedCheckin>> {
        self.outbox.list().await
    }

    pub async fn queue_count(&self) -> Result<u64> {
        self.outbox.count().await
    }

    /// Operator "clear all": drops every queued check-in, including
    /// exhausted ones. Irreversible.
    pub async fn clear_queue(&self) -> Result<()> {
        self.outbox.clear_all().await
    }

    pub async fn scan_history(&self) -> Vec<ScanHistoryEntry> {
        self.history.read().await.recent()
    }

    pub fn set_online(&self, online: bool) {
        self.connectivity.set_online(online);
    }

    pub fn is_online(&self) -> bool {
        use crate::application::ports::Connectivity;
        self.connectivity.is_online()
    }
}
