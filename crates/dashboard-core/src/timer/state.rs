use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 120);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Work,
    Break,
}

impl TimerMode {
    pub fn flipped(self) -> Self {
        match self {
            TimerMode::Work => TimerMode::Break,
            TimerMode::Break => TimerMode::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::Break => "Break",
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted fields of the work/break interval timer.
///
/// The serialized names match the dashboard's stored blob (`work`, `break`,
/// `remaining`, `lastTick`); the longer descriptive names are accepted on
/// input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Work interval length in minutes, 1..=120.
    #[serde(rename = "work", alias = "workMinutes", default = "default_work")]
    pub work_minutes: u32,
    /// Break interval length in minutes, 1..=60.
    #[serde(rename = "break", alias = "breakMinutes", default = "default_break")]
    pub break_minutes: u32,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub mode: TimerMode,
    #[serde(rename = "remaining", alias = "remainingSeconds", default)]
    pub remaining_seconds: u64,
    /// Epoch milliseconds of the last accounted tick. `None` while paused, or
    /// while running but not yet ticked.
    #[serde(rename = "lastTick", alias = "lastTickTimestamp", default)]
    pub last_tick: Option<i64>,
}

fn default_work() -> u32 {
    DEFAULT_WORK_MINUTES
}

fn default_break() -> u32 {
    DEFAULT_BREAK_MINUTES
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            running: false,
            mode: TimerMode::Work,
            remaining_seconds: u64::from(DEFAULT_WORK_MINUTES) * 60,
            last_tick: None,
        }
    }
}

impl TimerState {
    /// Configured length of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let minutes = match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::Break => self.break_minutes,
        };
        u64::from(minutes).saturating_mul(60)
    }

    pub fn current_duration_secs(&self) -> u64 {
        self.duration_secs(self.mode)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.current_duration_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.remaining_seconds as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// Bring a freshly decoded timer back inside its invariants.
    ///
    /// Returns `true` when anything had to change.
    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.work_minutes = clamp_minutes(self.work_minutes, WORK_MINUTES_RANGE);
        self.break_minutes = clamp_minutes(self.break_minutes, BREAK_MINUTES_RANGE);
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.current_duration_secs();
        }
        if !self.running {
            self.last_tick = None;
        }
        before != *self
    }
}

pub(crate) fn clamp_minutes(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}
