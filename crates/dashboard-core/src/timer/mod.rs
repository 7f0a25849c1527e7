mod engine;
mod notify;
mod state;

pub use engine::{parse_minutes, TimerEngine};
pub use notify::{LogNotifier, ModeSwitch, NoopNotifier, Notifier};
pub use state::{
    TimerMode, TimerState, BREAK_MINUTES_RANGE, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES,
    WORK_MINUTES_RANGE,
};
