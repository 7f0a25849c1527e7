//! Core error types for dashboard-core.
//!
//! Nothing in this crate is fatal to a running session. These types exist so
//! that callers can report what went wrong (a bad import file, an unreachable
//! store) while the in-memory state stays authoritative.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dashboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The store cannot currently be read or written
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Errors surfaced to the user when an import file is rejected.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid file format: not valid UTF-8")]
    NotUtf8,

    #[error("Invalid file format: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid file format: expected a JSON object at the top level")]
    NotAnObject,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure reported by an expiry notifier. Always swallowed by the engine.
#[derive(Error, Debug)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::ReadOnly
                    || e.code == rusqlite::ErrorCode::DiskFull =>
            {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<std::io::Error> for NotifyError {
    fn from(err: std::io::Error) -> Self {
        NotifyError(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
