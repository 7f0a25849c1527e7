//! Export, import and reset of the whole dashboard.

use std::path::PathBuf;

use clap::Subcommand;
use dashboard_core::{Config, EXPORT_FILE_NAME};

use super::{confirm, finish, open_dashboard, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write everything to a JSON file
    Export {
        /// Output path, or "-" for stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Merge a previously exported file into the current data
    Import {
        /// File to import
        path: PathBuf,
    },
    /// Delete all tasks, notes and habits, and reset the timer
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CliResult {
    let config = Config::load_or_default();
    let mut dash = open_dashboard(&config)?;

    match action {
        DataAction::Export { output } => {
            let json = dash.export();
            let path = output.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            if path.as_os_str() == "-" {
                println!("{json}");
            } else {
                std::fs::write(&path, json)?;
                println!("Exported to {}", path.display());
            }
        }
        DataAction::Import { path } => {
            dash.import_file(&path)?;
            let state = dash.state();
            println!(
                "Imported: {} tasks, {} notes, {} habits",
                state.tasks.len(),
                state.notes.len(),
                state.habits.len()
            );
        }
        DataAction::Reset { yes } => {
            if yes || confirm("Reset all data? This cannot be undone.")? {
                dash.reset_all();
                println!("All data reset");
            } else {
                println!("Cancelled");
            }
        }
    }

    finish(&mut dash)
}
