pub mod ingestion_service;
pub mod sync_service;

pub use ingestion_service::{IngestionService, ScanOutcome};
pub use sync_service::SyncService;
