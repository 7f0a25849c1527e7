//! Task, note and habit trackers.
//!
//! Each submodule defines one entity and the operations on its collection.
//! Operations are plain functions over `Vec<_>` so they can run against any
//! [`RootState`](crate::RootState) without touching persistence; unknown ids
//! are silent no-ops.

pub mod habit;
pub mod note;
pub mod task;

pub use habit::{Habit, HabitWeek};
pub use note::Note;
pub use task::Task;

use std::collections::HashSet;
use uuid::Uuid;

/// Anything stored in a tracker collection.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Fresh id not already used in `items`.
pub(crate) fn fresh_id<T: Identified>(items: &[T]) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        if !items.iter().any(|item| item.id() == id) {
            return id;
        }
    }
}

/// Trimmed input, or `None` when nothing is left.
pub(crate) fn clean_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Drop later elements whose id was already seen. Returns how many were dropped.
pub(crate) fn dedupe_ids<T: Identified>(items: &mut Vec<T>) -> usize {
    let before = items.len();
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.id().to_string()));
    before - items.len()
}

pub(crate) fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
