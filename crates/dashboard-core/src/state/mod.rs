//! The Root State: every tracker collection plus the timer, persisted as one
//! snapshot.

mod codec;

pub use codec::{
    export_pretty, load_or_default, merge, parse_import, serialize, PartialRootState,
    EXPORT_FILE_NAME,
};

use serde::{Deserialize, Serialize};

use crate::timer::TimerState;
use crate::tracker::{dedupe_ids, Habit, Note, Task};

/// Aggregate of all four trackers. One serialized `RootState` is one
/// snapshot in the durable store.
///
/// Field names on the wire follow the stored blob (`todos`, `pomodoro`);
/// `tasks` and `timer` are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootState {
    #[serde(rename = "todos", alias = "tasks", default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(rename = "pomodoro", alias = "timer", default)]
    pub timer: TimerState,
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl RootState {
    /// Restore invariants on decoded data: unique ids per collection and a
    /// timer inside its ranges.
    pub fn normalize(&mut self) {
        let dropped = dedupe_ids(&mut self.tasks)
            + dedupe_ids(&mut self.notes)
            + dedupe_ids(&mut self.habits);
        if dropped > 0 {
            tracing::warn!(dropped, "dropped entries with duplicate ids");
        }
        if self.timer.normalize() {
            tracing::debug!("timer fields adjusted on load");
        }
    }
}
