//! Integration tests for the dashboard container.
//!
//! Covers the session lifecycle across reopen (timer resume, snapshot
//! durability), import and reset, and behaviour when the store misbehaves.

use std::sync::{Arc, Mutex};

use dashboard_core::storage::DurableStore;
use dashboard_core::{
    Clock, Config, CoreError, Dashboard, Event, ImportError, ManualClock, MemoryStore, ModeSwitch,
    NotifyError, RootState, SqliteStore, TimerEngine, TimerMode,
};

const T0: i64 = 1_700_000_000_000;
const KEY: &str = "mpd_state_v1";

fn open<S: DurableStore>(store: S, clock: &ManualClock) -> Dashboard<S> {
    Dashboard::open_with(
        store,
        &Config::default(),
        TimerEngine::default(),
        Box::new(clock.clone()),
    )
}

#[test]
fn running_timer_resumes_with_background_time() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.start_timer();
    clock.advance_secs(10);
    dash.poll();
    assert!(dash.flush() || !dash.scheduler().is_dirty());
    let store = dash.store().clone();

    // The process is gone for five minutes.
    clock.advance_secs(300);
    let dash = open(store, &clock);
    assert!(dash.state().timer.running);
    assert_eq!(dash.state().timer.remaining_seconds, 1500 - 310);
    assert_eq!(dash.state().timer.last_tick, Some(clock.now_ms()));
}

#[test]
fn running_timer_without_last_tick_resumes_now() {
    let clock = ManualClock::new(T0);
    let blob = r#"{"todos":[],"notes":[],"pomodoro":{"work":25,"break":5,"running":true,"mode":"work","remaining":600,"lastTick":null},"habits":[]}"#;
    let mut dash = open(MemoryStore::with_value(KEY, blob), &clock);

    // Background time before reattach is not recoverable; counting starts now.
    assert!(dash.state().timer.running);
    assert_eq!(dash.state().timer.remaining_seconds, 600);
    assert_eq!(dash.state().timer.last_tick, Some(T0));

    clock.advance_secs(4);
    dash.poll();
    assert_eq!(dash.state().timer.remaining_seconds, 596);
}

#[test]
fn reattach_after_long_absence_switches_mode() {
    let clock = ManualClock::new(T0);
    let blob = format!(
        r#"{{"pomodoro":{{"work":25,"break":5,"running":true,"mode":"work","remaining":30,"lastTick":{T0}}}}}"#
    );
    clock.advance_secs(3600);
    let dash = open(MemoryStore::with_value(KEY, &blob), &clock);
    assert_eq!(dash.state().timer.mode, TimerMode::Break);
    assert_eq!(dash.state().timer.remaining_seconds, 300);
    assert!(dash.state().timer.running);
}

#[test]
fn import_with_only_tasks_keeps_everything_else() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.add_task("old task");
    dash.add_note("keep me");
    let habit = dash.add_habit("Stretch").unwrap();
    dash.toggle_habit_today(&habit);
    dash.set_durations(Some(40), Some(8));
    let before = dash.state().clone();

    dash.import(br#"{"tasks":[{"id":"t1","text":"imported","done":true,"createdAt":5}]}"#)
        .unwrap();

    let after = dash.state();
    assert_eq!(after.tasks.len(), 1);
    assert_eq!(after.tasks[0].text, "imported");
    assert_eq!(after.notes, before.notes);
    assert_eq!(after.habits, before.habits);
    assert_eq!(after.timer, before.timer);

    // Written straight away.
    let stored = dash.store().peek(KEY).unwrap();
    assert!(stored.contains("imported"));
    assert!(!dash.scheduler().is_dirty());
}

#[test]
fn malformed_import_leaves_state_untouched() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.add_task("precious");
    let before = dash.state().clone();

    let err = dash.import(b"definitely not json").unwrap_err();
    assert!(matches!(err, ImportError::Malformed(_)));
    assert!(err.to_string().starts_with("Invalid file format"));
    assert!(matches!(dash.import(b"42"), Err(ImportError::NotAnObject)));
    assert_eq!(dash.state(), &before);
    assert_eq!(dash.store().write_count(), 0);
}

#[test]
fn import_ignores_timer_written_as_array() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.set_durations(Some(40), Some(8));
    let before = dash.state().timer;

    dash.import(br#"{"pomodoro":[1,2]}"#).unwrap();
    assert_eq!(dash.state().timer, before);
    assert_eq!(dash.state().timer.remaining_seconds, 2400);
}

#[test]
fn import_file_reports_io_and_format_errors() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);

    let missing = dir.path().join("missing.json");
    assert!(matches!(dash.import_file(&missing), Err(CoreError::Io(_))));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "[]").unwrap();
    assert!(matches!(
        dash.import_file(&bad),
        Err(CoreError::Import(ImportError::NotAnObject))
    ));

    let good = dir.path().join("good.json");
    std::fs::write(&good, r#"{"notes":[{"id":"n1","text":"from disk","createdAt":1}]}"#).unwrap();
    dash.import_file(&good).unwrap();
    assert_eq!(dash.state().notes[0].text, "from disk");
}

#[test]
fn export_is_pretty_and_reimportable() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.add_task("a");
    dash.add_note("b");
    dash.add_habit("c");
    let exported = dash.export();
    assert!(exported.contains('\n'));

    let mut other = open(MemoryStore::new(), &clock);
    other.import(exported.as_bytes()).unwrap();
    assert_eq!(other.state(), dash.state());
}

#[test]
fn reset_is_idempotent_and_durable() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.add_task("x");
    dash.start_timer();
    dash.reset_all();
    let once = dash.state().clone();
    dash.reset_all();
    assert_eq!(dash.state(), &once);
    assert_eq!(once, RootState::default());

    let reopened = open(dash.store().clone(), &clock);
    assert_eq!(reopened.state(), &RootState::default());
}

#[test]
fn unreadable_store_starts_from_defaults() {
    let clock = ManualClock::new(T0);
    let mut store = MemoryStore::with_value(KEY, r#"{"todos":[{"id":"x","text":"y"}]}"#);
    store.fail_reads(true);
    let mut dash = open(store, &clock);
    assert_eq!(dash.state(), &RootState::default());

    // The session still works in memory.
    assert!(dash.add_task("offline").is_some());
    assert_eq!(dash.state().tasks.len(), 1);
}

#[test]
fn failed_writes_keep_memory_and_retry() {
    let clock = ManualClock::new(T0);
    let mut store = MemoryStore::new();
    store.fail_writes(true);
    let mut dash = open(store, &clock);

    dash.add_task("survives");
    clock.advance(500);
    dash.poll();
    assert_eq!(dash.state().tasks.len(), 1);
    assert!(dash.scheduler().is_dirty());
    assert_eq!(dash.scheduler().failed_writes(), 1);

    dash.store_mut().fail_writes(false);
    clock.advance(500);
    dash.poll();
    assert!(!dash.scheduler().is_dirty());
    assert!(dash.store().peek(KEY).unwrap().contains("survives"));
}

#[test]
fn idle_dashboard_does_not_write() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    for _ in 0..30 {
        clock.advance_secs(1);
        dash.poll();
    }
    assert_eq!(dash.store().write_count(), 0);
}

#[test]
fn running_timer_is_saved_within_the_fallback_interval() {
    let clock = ManualClock::new(T0);
    let mut dash = open(MemoryStore::new(), &clock);
    dash.start_timer();
    clock.advance(100);
    dash.poll();
    assert_eq!(dash.store().write_count(), 0);
    for _ in 0..2 {
        clock.advance_secs(1);
        dash.poll();
    }
    assert!(dash.store().write_count() >= 1);
    let stored = dash.store().peek(KEY).unwrap();
    assert!(stored.contains(r#""running":true"#));
}

#[test]
fn expiry_notifies_even_when_notifier_fails() {
    let clock = ManualClock::new(T0);
    let calls: Arc<Mutex<u32>> = Arc::default();
    let counter = Arc::clone(&calls);
    let engine = TimerEngine::with_notifier(move |_: &ModeSwitch| -> Result<(), NotifyError> {
        *counter.lock().unwrap() += 1;
        Err(NotifyError("speaker unplugged".into()))
    });
    let mut dash = Dashboard::open_with(
        MemoryStore::new(),
        &Config::default(),
        engine,
        Box::new(clock.clone()),
    );
    dash.set_durations(Some(1), Some(1));
    dash.start_timer();
    clock.advance_secs(60);
    assert!(matches!(dash.poll(), Some(Event::ModeSwitched { .. })));
    clock.advance_secs(60);
    assert!(matches!(dash.poll(), Some(Event::ModeSwitched { .. })));
    assert_eq!(*calls.lock().unwrap(), 2);
    assert_eq!(dash.state().timer.mode, TimerMode::Work);
    assert!(dash.state().timer.running);
}

#[test]
fn sqlite_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.db");
    let clock = ManualClock::new(T0);

    let mut dash = open(SqliteStore::open_at(&path).unwrap(), &clock);
    let id = dash.add_task("persist me").unwrap();
    dash.toggle_task(&id);
    dash.add_note("and me");
    assert!(dash.flush());
    drop(dash);

    let dash = open(SqliteStore::open_at(&path).unwrap(), &clock);
    assert_eq!(dash.state().tasks.len(), 1);
    assert!(dash.state().tasks[0].done);
    assert_eq!(dash.state().notes[0].text, "and me");
}

#[test]
fn custom_storage_key_is_respected() {
    let clock = ManualClock::new(T0);
    let mut config = Config::default();
    config.storage.key = "other".into();
    let mut dash = Dashboard::open_with(
        MemoryStore::new(),
        &config,
        TimerEngine::default(),
        Box::new(clock.clone()),
    );
    dash.add_task("x");
    dash.flush();
    assert!(dash.store().peek("other").is_some());
    assert!(dash.store().peek(KEY).is_none());
}

#[test]
fn long_running_session_keeps_changes_from_another_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.db");
    let clock = ManualClock::new(T0);

    let mut watcher = open(SqliteStore::open_at(&path).unwrap(), &clock);
    watcher.start_timer();
    assert!(watcher.flush());

    clock.advance_secs(1);
    let mut other = open(SqliteStore::open_at(&path).unwrap(), &clock);
    other.add_task("added while watching");
    other.pause_timer();
    assert!(other.flush());
    drop(other);

    for _ in 0..3 {
        clock.advance_secs(1);
        watcher.refresh();
        watcher.poll();
    }
    watcher.flush();
    drop(watcher);

    let reopened = open(SqliteStore::open_at(&path).unwrap(), &clock);
    assert_eq!(reopened.state().tasks.len(), 1);
    assert_eq!(reopened.state().tasks[0].text, "added while watching");
    assert!(!reopened.state().timer.running);
}

#[test]
fn refresh_keeps_a_running_timer_counting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.db");
    let clock = ManualClock::new(T0);

    let mut watcher = open(SqliteStore::open_at(&path).unwrap(), &clock);
    watcher.start_timer();
    assert!(watcher.flush());

    clock.advance_secs(5);
    let mut other = open(SqliteStore::open_at(&path).unwrap(), &clock);
    other.add_note("hello");
    assert!(other.flush());
    drop(other);

    clock.advance_secs(5);
    assert!(watcher.refresh());
    assert!(watcher.state().timer.running);
    assert_eq!(watcher.state().timer.remaining_seconds, 1500 - 10);
    assert_eq!(watcher.state().notes.len(), 1);
}
