//! In-process store for tests and throwaway sessions.

use std::collections::HashMap;

use super::DurableStore;
use crate::error::StoreError;

/// HashMap-backed [`DurableStore`] that can be told to fail, to exercise
/// the store-unavailable paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `value` under `key`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn peek(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
