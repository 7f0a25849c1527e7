//! The dashboard: one Root State plus everything that acts on it.
//!
//! A [`Dashboard`] owns the state, the durable store, the save scheduler,
//! the timer engine and the clock. Every UI event is a method here; each
//! mutation marks the state dirty and [`Dashboard::poll`] decides when to
//! write it out. Nothing lives in module-level statics, so several
//! dashboards (one per test, say) can coexist.

use std::path::Path;

use chrono::NaiveDate;

use crate::clock::{Clock, SystemClock};
use crate::error::{ImportError, Result};
use crate::events::Event;
use crate::persistence::PersistenceScheduler;
use crate::state::{export_pretty, load_or_default, merge, parse_import, serialize, RootState};
use crate::storage::{Config, DurableStore, SqliteStore};
use crate::timer::{parse_minutes, TimerEngine};
use crate::tracker::{habit, note, task};
use crate::view;

pub struct Dashboard<S: DurableStore> {
    state: RootState,
    store: S,
    scheduler: PersistenceScheduler,
    engine: TimerEngine,
    clock: Box<dyn Clock>,
    /// Snapshot as last read from or written to the store.
    last_seen: Option<String>,
}

impl<S: DurableStore> std::fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<S: DurableStore> Dashboard<S> {
    /// Open with the system clock and a silent timer.
    pub fn open(store: S, config: &Config) -> Self {
        Self::open_with(store, config, TimerEngine::default(), Box::new(SystemClock))
    }

    /// Load the snapshot from `store` and resume a timer that was running
    /// when the previous session ended.
    ///
    /// An unreadable store or snapshot yields the default state; the
    /// session carries on in memory either way.
    pub fn open_with(
        store: S,
        config: &Config,
        engine: TimerEngine,
        clock: Box<dyn Clock>,
    ) -> Self {
        let scheduler = PersistenceScheduler::new(config.storage.key.clone(), &config.persistence);
        let raw = match store.get(scheduler.key()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = scheduler.key(), "could not read snapshot: {e}");
                None
            }
        };
        let state = load_or_default(raw.as_deref());

        let mut dashboard = Self {
            state,
            store,
            scheduler,
            engine,
            clock,
            last_seen: raw,
        };
        if dashboard.state.timer.running {
            // Keep ticking without Start: a persisted lastTick is honoured,
            // a missing one means "count from now".
            tracing::debug!(
                last_tick = ?dashboard.state.timer.last_tick,
                "resuming running timer"
            );
            dashboard.tick_timer();
        }
        dashboard
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn scheduler(&self) -> &PersistenceScheduler {
        &self.scheduler
    }

    pub fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn timer_snapshot(&self) -> Event {
        TimerEngine::snapshot(&self.state.timer, self.now())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, text: &str) -> Option<String> {
        let id = task::add(&mut self.state.tasks, text, self.clock.now_ms())?;
        self.touch();
        Some(id)
    }

    pub fn toggle_task(&mut self, id: &str) -> bool {
        let changed = task::toggle(&mut self.state.tasks, id);
        self.touch_if(changed)
    }

    pub fn set_task_done(&mut self, id: &str, done: bool) -> bool {
        let changed = task::set_done(&mut self.state.tasks, id, done);
        self.touch_if(changed)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let changed = task::delete(&mut self.state.tasks, id);
        self.touch_if(changed)
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn add_note(&mut self, text: &str) -> Option<String> {
        let id = note::add(&mut self.state.notes, text, self.clock.now_ms())?;
        self.touch();
        Some(id)
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let changed = note::delete(&mut self.state.notes, id);
        self.touch_if(changed)
    }

    /// Remove every note. The caller is expected to have asked first.
    pub fn clear_notes(&mut self) -> usize {
        let removed = note::clear(&mut self.state.notes);
        self.touch_if(removed > 0);
        removed
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn add_habit(&mut self, name: &str) -> Option<String> {
        let id = habit::add(&mut self.state.habits, name)?;
        self.touch();
        Some(id)
    }

    pub fn toggle_habit_day(&mut self, id: &str, day: NaiveDate) -> Option<bool> {
        let marked = habit::toggle_day(&mut self.state.habits, id, day)?;
        self.touch();
        Some(marked)
    }

    pub fn toggle_habit_today(&mut self, id: &str) -> Option<bool> {
        self.toggle_habit_day(id, view::today())
    }

    pub fn delete_habit(&mut self, id: &str) -> bool {
        let changed = habit::delete(&mut self.state.habits, id);
        self.touch_if(changed)
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        let event = self.engine.start(&mut self.state.timer, self.clock.now_ms())?;
        self.touch();
        Some(event)
    }

    /// Account time up to now, then pause.
    pub fn pause_timer(&mut self) -> Option<Event> {
        self.tick_timer();
        let event = self.engine.pause(&mut self.state.timer, self.clock.now_ms())?;
        self.touch();
        Some(event)
    }

    pub fn reset_timer(&mut self) -> Event {
        let event = self.engine.reset(&mut self.state.timer, self.clock.now_ms());
        self.touch();
        event
    }

    pub fn set_durations(&mut self, work: Option<i64>, brk: Option<i64>) -> Event {
        let event = self
            .engine
            .set_durations(&mut self.state.timer, work, brk, self.clock.now_ms());
        self.touch();
        event
    }

    /// [`set_durations`](Self::set_durations) from raw form input.
    pub fn set_durations_from_input(&mut self, work: &str, brk: &str) -> Event {
        self.set_durations(parse_minutes(work), parse_minutes(brk))
    }

    // ── Periodic work ────────────────────────────────────────────────

    /// Drive the dashboard forward: tick the timer, then save if a save is
    /// due. Returns the expiry event if an interval ended.
    pub fn poll(&mut self) -> Option<Event> {
        let event = self.tick_timer();
        let now = self.clock.now_ms();
        let wrote = self.scheduler.poll(&self.state, &mut self.store, now);
        self.note_write(wrote);
        event
    }

    /// Save now if anything is unsaved. Returns `true` if a write succeeded.
    pub fn flush(&mut self) -> bool {
        let now = self.clock.now_ms();
        let wrote = self.scheduler.flush(&self.state, &mut self.store, now);
        self.note_write(wrote)
    }

    /// Adopt a snapshot that another session wrote since this one last read
    /// or wrote the store. Unsaved changes made here are dropped; a running
    /// timer loses nothing because it is ticked again from the adopted
    /// `lastTick`. Returns `true` if the state was replaced.
    ///
    /// Long-lived sessions call this before [`poll`](Self::poll) so they do
    /// not overwrite changes made by short-lived ones.
    pub fn refresh(&mut self) -> bool {
        let raw = match self.store.get(self.scheduler.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(key = self.scheduler.key(), "could not re-read snapshot: {e}");
                return false;
            }
        };
        if self.last_seen.as_deref() == Some(raw.as_str()) {
            return false;
        }
        tracing::debug!(key = self.scheduler.key(), "adopting snapshot written elsewhere");
        self.state = load_or_default(Some(&raw));
        self.last_seen = Some(raw);
        self.scheduler.mark_clean();
        if self.state.timer.running {
            self.tick_timer();
        }
        true
    }

    // ── Export / import / reset ──────────────────────────────────────

    /// Pretty-printed snapshot for download.
    pub fn export(&self) -> String {
        export_pretty(&self.state)
    }

    /// Merge an import file onto the current state and save immediately.
    ///
    /// # Errors
    /// A file that is not a JSON object is rejected and the state is left
    /// as it was.
    pub fn import(&mut self, bytes: &[u8]) -> Result<(), ImportError> {
        let imported = parse_import(bytes)?;
        self.state = merge(self.state.clone(), imported);
        tracing::info!(
            tasks = self.state.tasks.len(),
            notes = self.state.notes.len(),
            habits = self.state.habits.len(),
            "data imported"
        );
        self.save_now();
        Ok(())
    }

    /// [`import`](Self::import) the file at `path`.
    ///
    /// # Errors
    /// Returns [`CoreError::Io`](crate::CoreError::Io) if the file cannot be
    /// read and [`CoreError::Import`](crate::CoreError::Import) if it is
    /// rejected.
    pub fn import_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)?;
        self.import(&bytes)?;
        Ok(())
    }

    /// Replace everything with the defaults and save immediately.
    pub fn reset_all(&mut self) {
        self.state = RootState::default();
        tracing::info!("all data reset");
        self.save_now();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_timer(&mut self) -> Option<Event> {
        let before = self.state.timer;
        let event = self.engine.tick(&mut self.state.timer, self.clock.now_ms());
        if self.state.timer != before {
            self.touch();
        }
        event
    }

    fn save_now(&mut self) {
        let now = self.clock.now_ms();
        self.scheduler.mark_dirty(now);
        let wrote = self.scheduler.force(&self.state, &mut self.store, now);
        self.note_write(wrote);
    }

    fn note_write(&mut self, wrote: bool) -> bool {
        if wrote {
            self.last_seen = Some(serialize(&self.state));
        }
        wrote
    }

    fn touch(&mut self) {
        self.scheduler.mark_dirty(self.clock.now_ms());
    }

    fn touch_if(&mut self, changed: bool) -> bool {
        if changed {
            self.touch();
        }
        changed
    }
}

impl Dashboard<SqliteStore> {
    /// Open the SQLite store in the data directory with the system clock.
    ///
    /// # Errors
    /// Returns [`CoreError::Store`](crate::CoreError::Store) if the database
    /// cannot be opened.
    pub fn open_default(config: &Config, engine: TimerEngine) -> Result<Self> {
        let store = SqliteStore::open()?;
        Ok(Self::open_with(store, config, engine, Box::new(SystemClock)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::timer::TimerMode;

    const T0: i64 = 1_700_000_000_000;

    fn dashboard() -> (Dashboard<MemoryStore>, ManualClock) {
        let clock = ManualClock::new(T0);
        let dash = Dashboard::open_with(
            MemoryStore::new(),
            &Config::default(),
            TimerEngine::default(),
            Box::new(clock.clone()),
        );
        (dash, clock)
    }

    #[test]
    fn open_on_empty_store_gives_defaults() {
        let dash = Dashboard::open(MemoryStore::new(), &Config::default());
        assert_eq!(dash.state(), &RootState::default());
        assert!(!dash.scheduler().is_dirty());
    }

    #[test]
    fn refresh_ignores_own_writes() {
        let (mut dash, _clock) = dashboard();
        assert!(!dash.refresh());
        dash.add_task("mine");
        assert!(dash.flush());
        assert!(!dash.refresh());
        assert_eq!(dash.state().tasks.len(), 1);
    }

    #[test]
    fn refresh_adopts_snapshot_written_elsewhere() {
        let (mut dash, clock) = dashboard();
        dash.add_task("mine");
        dash.flush();

        let mut elsewhere = dash.state().clone();
        task::add(&mut elsewhere.tasks, "theirs", T0);
        dash.store_mut().set("mpd_state_v1", &serialize(&elsewhere)).unwrap();

        dash.add_note("unsaved");
        clock.advance_secs(1);
        assert!(dash.refresh());
        assert_eq!(dash.state(), &elsewhere);
        assert!(!dash.scheduler().is_dirty());
        assert!(!dash.refresh());
    }

    #[test]
    fn add_toggle_delete_task_scenario() {
        let (mut dash, _clock) = dashboard();
        let id = dash.add_task("buy milk").unwrap();
        assert!(dash.toggle_task(&id));
        assert!(dash.state().tasks[0].done);
        assert!(dash.delete_task(&id));
        assert!(dash.state().tasks.is_empty());
    }

    #[test]
    fn noop_mutations_do_not_dirty() {
        let (mut dash, _clock) = dashboard();
        assert!(!dash.toggle_task("missing"));
        assert!(!dash.delete_note("missing"));
        assert!(dash.add_task("   ").is_none());
        assert_eq!(dash.clear_notes(), 0);
        assert!(dash.toggle_habit_day("missing", view::today()).is_none());
        assert!(!dash.scheduler().is_dirty());
    }

    #[test]
    fn mutation_is_saved_after_debounce() {
        let (mut dash, clock) = dashboard();
        dash.add_note("hello");
        dash.poll();
        assert_eq!(dash.store().write_count(), 0);
        clock.advance(300);
        dash.poll();
        assert_eq!(dash.store().write_count(), 1);
        assert!(dash.store().peek("mpd_state_v1").unwrap().contains("hello"));
    }

    #[test]
    fn pause_accounts_elapsed_time_first() {
        let (mut dash, clock) = dashboard();
        dash.start_timer();
        clock.advance_secs(90);
        dash.pause_timer();
        assert_eq!(dash.state().timer.remaining_seconds, 1500 - 90);
        assert!(!dash.state().timer.running);
        assert_eq!(dash.state().timer.last_tick, None);
    }

    #[test]
    fn poll_reports_expiry() {
        let (mut dash, clock) = dashboard();
        dash.set_durations(Some(1), Some(1));
        dash.start_timer();
        clock.advance_secs(61);
        let event = dash.poll();
        assert!(matches!(event, Some(Event::ModeSwitched { .. })));
        assert_eq!(dash.state().timer.mode, TimerMode::Break);
    }

    #[test]
    fn set_durations_from_input_parses_like_a_form() {
        let (mut dash, _clock) = dashboard();
        dash.set_durations_from_input("45 minutes", "abc");
        assert_eq!(dash.state().timer.work_minutes, 45);
        assert_eq!(dash.state().timer.break_minutes, 5);
        assert_eq!(dash.state().timer.remaining_seconds, 45 * 60);
    }

    #[test]
    fn reset_all_writes_defaults_immediately() {
        let (mut dash, _clock) = dashboard();
        dash.add_task("x");
        dash.reset_all();
        assert_eq!(dash.state(), &RootState::default());
        assert_eq!(dash.store().write_count(), 1);
        assert!(!dash.scheduler().is_dirty());
    }
}
