use checkin_kiosk::{AppConfig, AppState, Barcode, ScanOutcome};
use tempfile::TempDir;

#[tokio::test]
async fn operator_surface_over_a_real_database() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        database_path: dir.path().join("outbox.db"),
        ..AppConfig::default()
    };

    let state = AppState::new(config).await.unwrap();
    assert!(state.is_online());

    // Offline scans land in the queue and show up on the operator surface.
    state.set_online(false);
    let outcome = state.ingest(Barcode::new("X1").unwrap()).await.unwrap();
    assert_eq!(outcome, ScanOutcome::Queued { pending: 1 });

    assert_eq!(state.queue_count().await.unwrap(), 1);
    let queued = state.queued_checkins().await.unwrap();
    assert_eq!(queued[0].barcode.as_str(), "X1");

    let history = state.scan_history().await;
    assert!(history[0].success);
    assert!(history[0].label.contains("1 pending"));

    // Manual sync while offline touches nothing.
    let report = state.sync_now().await.unwrap();
    assert_eq!(report.total, 0);
    assert_eq!(state.queue_count().await.unwrap(), 1);

    state.clear_queue().await.unwrap();
    assert_eq!(state.queue_count().await.unwrap(), 0);
}
