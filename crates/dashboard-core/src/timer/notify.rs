//! Expiry notifications.
//!
//! The engine calls its notifier when an interval ends and the mode flips.
//! Notification is advisory: the engine never waits on it and discards any
//! error it reports.

use super::state::TimerMode;
use crate::error::NotifyError;

/// Details of an interval expiry handed to a [`Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitch {
    pub from: TimerMode,
    pub to: TimerMode,
    /// Length of the interval that just began.
    pub duration_secs: u64,
    pub at_ms: i64,
}

pub trait Notifier: Send {
    fn notify(&self, switch: &ModeSwitch) -> Result<(), NotifyError>;
}

impl<F> Notifier for F
where
    F: Fn(&ModeSwitch) -> Result<(), NotifyError> + Send,
{
    fn notify(&self, switch: &ModeSwitch) -> Result<(), NotifyError> {
        self(switch)
    }
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _switch: &ModeSwitch) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Emits an `info` event for each expiry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, switch: &ModeSwitch) -> Result<(), NotifyError> {
        tracing::info!(
            from = %switch.from,
            to = %switch.to,
            duration_secs = switch.duration_secs,
            "interval finished"
        );
        Ok(())
    }
}
