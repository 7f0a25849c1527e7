use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dashboard-cli", version, about = "Productivity dashboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// To-do list
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Weekly habit tracker
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Work/break interval timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Export, import and reset all data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DASHBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dashboard-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
