pub mod config;
pub mod data;
pub mod habit;
pub mod note;
pub mod task;
pub mod timer;

use std::io::{BufRead, Write};

use dashboard_core::timer::{LogNotifier, ModeSwitch, Notifier};
use dashboard_core::tracker::Identified;
use dashboard_core::{Config, Dashboard, NotifyError, SqliteStore, TimerEngine};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the dashboard stored in the data directory.
pub fn open_dashboard(config: &Config) -> Result<Dashboard<SqliteStore>, Box<dyn std::error::Error>> {
    let dash = Dashboard::open_default(config, TimerEngine::new(notifier(config)))?;
    Ok(dash)
}

fn notifier(config: &Config) -> Box<dyn Notifier> {
    if config.notifications.enabled && config.notifications.bell {
        Box::new(BellNotifier)
    } else {
        Box::new(LogNotifier)
    }
}

/// Rings the terminal bell and says which interval started.
struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self, switch: &ModeSwitch) -> Result<(), NotifyError> {
        let mut err = std::io::stderr().lock();
        writeln!(
            err,
            "\x07{} finished, {} started ({} min)",
            switch.from,
            switch.to,
            switch.duration_secs / 60
        )?;
        err.flush()?;
        Ok(())
    }
}

/// Find the one item whose id starts with `prefix`.
pub fn resolve_id<T: Identified>(items: &[T], prefix: &str) -> Result<String, String> {
    if let Some(exact) = items.iter().find(|item| item.id() == prefix) {
        return Ok(exact.id().to_string());
    }
    let matches: Vec<&T> = items.iter().filter(|item| item.id().starts_with(prefix)).collect();
    match matches.as_slice() {
        [one] => Ok(one.id().to_string()),
        [] => Err(format!("no item with id '{prefix}'")),
        _ => Err(format!("id prefix '{prefix}' is ambiguous ({} matches)", matches.len())),
    }
}

/// Short form of an id for display.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Ask a yes/no question on stderr, reading the answer from stdin.
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Save before exiting; the CLI is a short-lived session.
pub fn finish(dashboard: &mut Dashboard<SqliteStore>) -> CliResult {
    dashboard.flush();
    if dashboard.scheduler().is_dirty() {
        return Err("could not save dashboard state".into());
    }
    Ok(())
}
