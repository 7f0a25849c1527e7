use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use dashboard_core::{view, Config, Dashboard, Event, SqliteStore};

use super::{finish, open_dashboard, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the current interval
    Start,
    /// Pause the current interval
    Pause,
    /// Stop and return to a full work interval
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Set work and break lengths in minutes
    Durations {
        /// Work minutes (1-120)
        work: String,
        /// Break minutes (1-60)
        #[arg(value_name = "BREAK")]
        brk: String,
    },
    /// Keep the timer ticking in the foreground until Ctrl-C
    Watch {
        /// Stop after this many seconds
        #[arg(long = "for")]
        for_secs: Option<u64>,
    },
}

fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load_or_default();
    let mut dash = open_dashboard(&config)?;

    match action {
        TimerAction::Start => {
            let event = dash.start_timer().unwrap_or_else(|| dash.timer_snapshot());
            print_event(&event)?;
        }
        TimerAction::Pause => {
            let event = dash.pause_timer().unwrap_or_else(|| dash.timer_snapshot());
            print_event(&event)?;
        }
        TimerAction::Reset => print_event(&dash.reset_timer())?,
        TimerAction::Status => {
            if let Some(event) = dash.poll() {
                print_event(&event)?;
            }
            print_event(&dash.timer_snapshot())?;
        }
        TimerAction::Durations { work, brk } => {
            print_event(&dash.set_durations_from_input(&work, &brk))?;
        }
        TimerAction::Watch { for_secs } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch(&mut dash, &config, for_secs))?;
        }
    }

    finish(&mut dash)
}

async fn watch(dash: &mut Dashboard<SqliteStore>, config: &Config, for_secs: Option<u64>) -> CliResult {
    let period = Duration::from_millis(config.timer.tick_interval_ms.max(50));
    let mut ticker = tokio::time::interval(period);
    let deadline = async {
        match for_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Pick up changes other commands saved while we were running.
                if dash.refresh() {
                    tracing::debug!("reloaded dashboard saved by another command");
                }
                if let Some(event) = dash.poll() {
                    println!();
                    print_event(&event)?;
                }
                let timer = &dash.state().timer;
                let state = if timer.running { "" } else { " (paused)" };
                print!(
                    "\r{} {} {:>3.0}%{}   ",
                    timer.mode.label(),
                    view::format_clock(timer.remaining_seconds),
                    timer.progress() * 100.0,
                    state
                );
                std::io::stdout().flush()?;
            }
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    println!();
    dash.refresh();
    tracing::debug!("watch stopped");
    Ok(())
}
