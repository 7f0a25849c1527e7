//! Snapshot write scheduling.
//!
//! Mutations mark the state dirty. A save happens once the session has been
//! quiet for the debounce period, or once the fallback interval has passed
//! since the first unsaved mutation, whichever comes first. A clean state is
//! never written, so an idle dashboard does no I/O, and no mutation stays
//! unsaved for much longer than the fallback interval.

use crate::state::{serialize, RootState};
use crate::storage::{DurableStore, PersistenceConfig};

#[derive(Debug, Clone)]
pub struct PersistenceScheduler {
    key: String,
    debounce_ms: i64,
    fallback_interval_ms: i64,
    /// First unsaved mutation.
    dirty_since: Option<i64>,
    /// Most recent unsaved mutation.
    last_mutation: Option<i64>,
    last_write: Option<i64>,
    failed_writes: u64,
}

impl PersistenceScheduler {
    pub fn new(key: impl Into<String>, config: &PersistenceConfig) -> Self {
        Self {
            key: key.into(),
            debounce_ms: to_ms(config.debounce_ms),
            fallback_interval_ms: to_ms(config.fallback_interval_ms),
            dirty_since: None,
            last_mutation: None,
            last_write: None,
            failed_writes: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    pub fn last_write(&self) -> Option<i64> {
        self.last_write
    }

    /// Writes that failed since the scheduler was created.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    pub fn mark_dirty(&mut self, now_ms: i64) {
        self.dirty_since.get_or_insert(now_ms);
        self.last_mutation = Some(now_ms);
    }

    /// Forget unsaved mutations, e.g. after the state was replaced by what
    /// is already in the store.
    pub fn mark_clean(&mut self) {
        self.dirty_since = None;
        self.last_mutation = None;
    }

    /// Whether a save should happen at `now_ms`.
    pub fn is_due(&self, now_ms: i64) -> bool {
        let (Some(since), Some(last)) = (self.dirty_since, self.last_mutation) else {
            return false;
        };
        now_ms.saturating_sub(last) >= self.debounce_ms
            || now_ms.saturating_sub(since) >= self.fallback_interval_ms
    }

    /// Save if due. Returns `true` when a snapshot was written.
    pub fn poll<S: DurableStore + ?Sized>(
        &mut self,
        state: &RootState,
        store: &mut S,
        now_ms: i64,
    ) -> bool {
        self.is_due(now_ms) && self.write(state, store, now_ms)
    }

    /// Save now if anything is unsaved.
    pub fn flush<S: DurableStore + ?Sized>(
        &mut self,
        state: &RootState,
        store: &mut S,
        now_ms: i64,
    ) -> bool {
        self.is_dirty() && self.write(state, store, now_ms)
    }

    /// Save now, dirty or not.
    pub fn force<S: DurableStore + ?Sized>(
        &mut self,
        state: &RootState,
        store: &mut S,
        now_ms: i64,
    ) -> bool {
        self.write(state, store, now_ms)
    }

    /// A failed write is logged and leaves the state dirty, so the next poll
    /// retries. Memory is never rolled back.
    fn write<S: DurableStore + ?Sized>(
        &mut self,
        state: &RootState,
        store: &mut S,
        now_ms: i64,
    ) -> bool {
        let snapshot = serialize(state);
        match store.set(&self.key, &snapshot) {
            Ok(()) => {
                self.dirty_since = None;
                self.last_mutation = None;
                self.last_write = Some(now_ms);
                tracing::debug!(key = %self.key, bytes = snapshot.len(), "snapshot saved");
                true
            }
            Err(e) => {
                self.failed_writes += 1;
                // Restart the windows so a dead store is retried after the
                // debounce rather than on every poll.
                self.dirty_since = Some(now_ms);
                self.last_mutation = Some(now_ms);
                tracing::warn!(key = %self.key, "snapshot save failed: {e}");
                false
            }
        }
    }
}

fn to_ms(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
