mod config;
pub mod database;
pub mod memory;

pub use config::{Config, NotificationsConfig, PersistenceConfig, StorageConfig, TimerConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Key under which the snapshot is stored unless configured otherwise.
pub const DEFAULT_STATE_KEY: &str = "mpd_state_v1";

/// Host key-value storage holding the serialized snapshot.
///
/// Implementations are expected to be synchronous and durable once `set`
/// returns `Ok`.
pub trait DurableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: DurableStore + ?Sized> DurableStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Returns the data directory.
///
/// `DASHBOARD_DATA_DIR` wins when set. Otherwise `~/.config/dashboard[-dev]/`
/// based on DASHBOARD_ENV (set DASHBOARD_ENV=dev to use the development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("DASHBOARD_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DASHBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dashboard-dev")
            } else {
                base_dir.join("dashboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
