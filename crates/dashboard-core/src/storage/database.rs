//! SQLite-backed durable store.
//!
//! A single `kv` table holds the snapshot (and anything else a caller wants
//! to keep under its own key).

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, DurableStore};
use crate::error::StoreError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open the store at `<data_dir>/dashboard.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::open_at(dir.join("dashboard.db"))
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let open_failed = |source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        };
        let conn = Connection::open(&path).map_err(open_failed)?;
        // Other CLI runs may hold the write lock briefly.
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_failed)?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.migrate()?;
        Ok(store)
    }

    /// Database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );",
        )?;
        Ok(())
    }
}

impl DurableStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }
}
