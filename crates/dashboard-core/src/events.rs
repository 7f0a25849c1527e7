use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The front end prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran out and the next one started immediately.
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        work_minutes: u32,
        break_minutes: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        /// `MM:SS` rendering of `remaining_secs`.
        display: String,
        work_minutes: u32,
        break_minutes: u32,
        at: DateTime<Utc>,
    },
}

/// Convert epoch milliseconds to a UTC timestamp, falling back to the epoch
/// for values chrono cannot represent.
pub(crate) fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
