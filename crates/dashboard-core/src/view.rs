//! Render-time derivations.
//!
//! Display order and formatting are computed from the Root State when shown
//! and never stored.

use chrono::{Duration, Local, NaiveDate};

use crate::tracker::{Habit, Note, Task};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// `MM:SS`, with minutes zero-padded to two digits (and allowed past 59).
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `YYYY-MM-DD` key for a calendar day.
pub fn date_key(day: NaiveDate) -> String {
    day.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Today in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_key() -> String {
    date_key(today())
}

/// The seven days ending at `today`, oldest first.
pub fn last_seven_days(today: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| today - Duration::days(6 - i as i64))
}

/// Marked state of `habit` for each of the last seven days, oldest first.
pub fn habit_strip(habit: &Habit, today: NaiveDate) -> [(NaiveDate, bool); 7] {
    last_seven_days(today).map(|day| (day, habit.week.contains(day)))
}

/// Most recently created first. Ties keep insertion order.
pub fn tasks_by_recency(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Last added first.
pub fn notes_newest_first(notes: &[Note]) -> impl Iterator<Item = &Note> {
    notes.iter().rev()
}

pub fn pending_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.done).count()
}

pub fn done_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.done).count()
}
