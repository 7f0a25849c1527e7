//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine over [`TimerState`].
//! It does not use internal threads - the caller is responsible for calling
//! `tick()` periodically and for passing the current time in.
//!
//! ## State Transitions
//!
//! ```text
//! (work, paused) --start--> (work, running) --expiry--> (break, running)
//!        ^                        |                            |
//!        +-------- reset ---------+-------- pause / reset -----+
//! ```
//!
//! Each tick accounts the whole wall-clock delta since the previous one, so
//! a host that delays or drops scheduled callbacks (a suspended laptop, a
//! backgrounded process) still ends up with the right remaining time on the
//! next tick.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = TimerEngine::default();
//! engine.start(&mut state.timer, clock.now_ms());
//! // In a loop:
//! engine.tick(&mut state.timer, clock.now_ms()); // Some(Event) on expiry
//! ```

use super::notify::{ModeSwitch, NoopNotifier, Notifier};
use super::state::{
    clamp_minutes, TimerMode, TimerState, BREAK_MINUTES_RANGE, DEFAULT_BREAK_MINUTES,
    DEFAULT_WORK_MINUTES, WORK_MINUTES_RANGE,
};
use crate::events::{at, Event};
use crate::view::format_clock;

/// Core timer engine.
///
/// Holds only the expiry notifier; all timer data lives in the
/// [`TimerState`] passed to each call.
pub struct TimerEngine {
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine").finish_non_exhaustive()
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Box::new(NoopNotifier))
    }
}

impl TimerEngine {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn with_notifier(notifier: impl Notifier + 'static) -> Self {
        Self::new(Box::new(notifier))
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Build a full state snapshot event.
    pub fn snapshot(timer: &TimerState, now_ms: i64) -> Event {
        Event::StateSnapshot {
            mode: timer.mode,
            running: timer.running,
            remaining_secs: timer.remaining_seconds,
            display: format_clock(timer.remaining_seconds),
            work_minutes: timer.work_minutes,
            break_minutes: timer.break_minutes,
            at: at(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&self, timer: &mut TimerState, now_ms: i64) -> Option<Event> {
        if timer.running {
            return None;
        }
        timer.running = true;
        timer.last_tick = Some(now_ms);
        tracing::debug!(mode = %timer.mode, remaining = timer.remaining_seconds, "timer started");
        Some(Event::TimerStarted {
            mode: timer.mode,
            remaining_secs: timer.remaining_seconds,
            at: at(now_ms),
        })
    }

    /// Stop accounting time. Remaining time stays where the last tick left it.
    pub fn pause(&self, timer: &mut TimerState, now_ms: i64) -> Option<Event> {
        let was_running = timer.running;
        timer.running = false;
        timer.last_tick = None;
        if !was_running {
            return None;
        }
        tracing::debug!(remaining = timer.remaining_seconds, "timer paused");
        Some(Event::TimerPaused {
            mode: timer.mode,
            remaining_secs: timer.remaining_seconds,
            at: at(now_ms),
        })
    }

    /// Back to a paused work interval of full length, whatever the prior state.
    pub fn reset(&self, timer: &mut TimerState, now_ms: i64) -> Event {
        timer.mode = TimerMode::Work;
        timer.running = false;
        timer.last_tick = None;
        timer.remaining_seconds = timer.duration_secs(TimerMode::Work);
        tracing::debug!("timer reset");
        Event::TimerReset {
            remaining_secs: timer.remaining_seconds,
            at: at(now_ms),
        }
    }

    /// Configure interval lengths in minutes.
    ///
    /// `None` stands for missing or non-numeric input and falls back to
    /// 25/5. Values are clamped into 1..=120 and 1..=60. The current
    /// interval restarts at its new full length; `running` and `mode` are
    /// left alone.
    pub fn set_durations(
        &self,
        timer: &mut TimerState,
        work: Option<i64>,
        brk: Option<i64>,
        now_ms: i64,
    ) -> Event {
        timer.work_minutes = clamp_input(work, DEFAULT_WORK_MINUTES, WORK_MINUTES_RANGE);
        timer.break_minutes = clamp_input(brk, DEFAULT_BREAK_MINUTES, BREAK_MINUTES_RANGE);
        timer.remaining_seconds = timer.current_duration_secs();
        tracing::debug!(
            work = timer.work_minutes,
            brk = timer.break_minutes,
            "timer durations changed"
        );
        Event::DurationsChanged {
            work_minutes: timer.work_minutes,
            break_minutes: timer.break_minutes,
            remaining_secs: timer.remaining_seconds,
            at: at(now_ms),
        }
    }

    /// Call periodically. Returns `Some(Event::ModeSwitched)` when an
    /// interval runs out.
    pub fn tick(&self, timer: &mut TimerState, now_ms: i64) -> Option<Event> {
        if !timer.running {
            timer.last_tick = None;
            return None;
        }
        let Some(last) = timer.last_tick else {
            // Running without a reference point: start counting from here.
            timer.last_tick = Some(now_ms);
            return None;
        };

        let elapsed_secs = now_ms.saturating_sub(last).div_euclid(1000);
        if elapsed_secs <= 0 {
            // Sub-second tick or the clock went backwards.
            return None;
        }
        timer.remaining_seconds = timer.remaining_seconds.saturating_sub(elapsed_secs as u64);
        timer.last_tick = Some(now_ms);

        if timer.remaining_seconds == 0 {
            return Some(self.expire(timer, now_ms));
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expire(&self, timer: &mut TimerState, now_ms: i64) -> Event {
        let from = timer.mode;
        timer.mode = from.flipped();
        timer.remaining_seconds = timer.current_duration_secs();
        let switch = ModeSwitch {
            from,
            to: timer.mode,
            duration_secs: timer.remaining_seconds,
            at_ms: now_ms,
        };
        tracing::debug!(from = %from, to = %timer.mode, "interval expired");
        if let Err(e) = self.notifier.notify(&switch) {
            tracing::warn!("expiry notification failed: {e}");
        }
        Event::ModeSwitched {
            from,
            to: timer.mode,
            duration_secs: timer.remaining_seconds,
            at: at(now_ms),
        }
    }
}

fn clamp_input(value: Option<i64>, default: u32, range: (u32, u32)) -> u32 {
    match value {
        Some(v) => {
            let v = v.clamp(i64::from(range.0), i64::from(range.1));
            clamp_minutes(v as u32, range)
        }
        None => default,
    }
}

/// Read a minutes field the way a form input is read: leading whitespace,
/// an optional sign, then digits. Anything after the digits is ignored.
/// Returns `None` when no digits are present.
pub fn parse_minutes(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overlong digit strings saturate; they get clamped afterwards anyway.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
