pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::services::ScanOutcome;
pub use domain::scanner::{Key, KeyInput};
pub use domain::value_objects::Barcode;
pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::AppState;

pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin_kiosk=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
