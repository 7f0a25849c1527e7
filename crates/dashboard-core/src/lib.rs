//! # Dashboard Core Library
//!
//! This library provides the core logic for a single-user productivity
//! dashboard: tasks, notes, a work/break interval timer and weekly habit
//! marks, all kept in one state record that is persisted as a single
//! snapshot. Front ends (the CLI binary, or any other UI) read the state and
//! call the operations on [`Dashboard`].
//!
//! ## Architecture
//!
//! - **State Model**: [`RootState`] plus default construction, tolerant
//!   decoding and shallow merge-on-import
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()`; elapsed time is measured, never assumed
//! - **Trackers**: Task, note and habit operations over the state collections
//! - **Persistence**: Dirty-flag save scheduling over a [`DurableStore`]
//!   (SQLite or in-memory)
//!
//! ## Key Components
//!
//! - [`Dashboard`]: State container and UI event surface
//! - [`TimerEngine`]: Core timer state machine
//! - [`PersistenceScheduler`]: When to write snapshots
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod timer;
pub mod tracker;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard::Dashboard;
pub use error::{ConfigError, CoreError, ImportError, NotifyError, StoreError};
pub use events::Event;
pub use persistence::PersistenceScheduler;
pub use state::{RootState, EXPORT_FILE_NAME};
pub use storage::{Config, DurableStore, MemoryStore, SqliteStore};
pub use timer::{LogNotifier, ModeSwitch, NoopNotifier, Notifier, TimerEngine, TimerMode, TimerState};
pub use tracker::{Habit, HabitWeek, Note, Task};
