use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::shared::error::{AppError, Result};

/// Runtime configuration for the kiosk core, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the SQLite file backing the outbox.
    pub database_path: PathBuf,
    /// Base URL of the remote check-in API.
    pub api_base_url: String,
    /// Upper bound for every remote call.
    pub request_timeout: Duration,
    /// Retry ceiling copied into each queued check-in at creation.
    pub max_retries: u32,
    /// Quiet window after which a scan burst is considered complete.
    pub debounce_window: Duration,
    /// Interval of the background sync timer.
    pub sync_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(10),
            max_retries: 5,
            debounce_window: Duration::from_millis(150),
            sync_interval: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Build a config from `KIOSK_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("KIOSK_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Ok(url) = env::var("KIOSK_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(secs) = u64_env("KIOSK_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(count) = u64_env("KIOSK_MAX_RETRIES")? {
            config.max_retries = count as u32;
        }
        if let Some(millis) = u64_env("KIOSK_DEBOUNCE_MS")? {
            config.debounce_window = Duration::from_millis(millis);
        }
        if let Some(secs) = u64_env("KIOSK_SYNC_INTERVAL_SECS")? {
            config.sync_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn u64_env(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| AppError::Configuration(format!("invalid {name}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("./data"))
        .join("checkin-kiosk")
        .join("outbox.db")
}
