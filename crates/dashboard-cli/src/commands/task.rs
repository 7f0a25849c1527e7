//! To-do list commands for CLI.

use clap::Subcommand;
use dashboard_core::{view, Config};

use super::{finish, open_dashboard, resolve_id, short_id, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks, most recent first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a task between pending and done
    Toggle {
        /// Task ID (a unique prefix is enough)
        id: String,
    },
    /// Mark a task done
    Done {
        /// Task ID (a unique prefix is enough)
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID (a unique prefix is enough)
        id: String,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let config = Config::load_or_default();
    let mut dash = open_dashboard(&config)?;

    match action {
        TaskAction::Add { text } => match dash.add_task(&text) {
            Some(id) => println!("Task added: {}", short_id(&id)),
            None => return Err("task text is empty".into()),
        },
        TaskAction::List { json } => {
            let tasks = view::tasks_by_recency(&dash.state().tasks);
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in tasks {
                    let mark = if task.done { "x" } else { " " };
                    println!("[{mark}] {}  {}", short_id(&task.id), task.text);
                }
                let tasks = &dash.state().tasks;
                println!(
                    "{} pending, {} done",
                    view::pending_count(tasks),
                    view::done_count(tasks)
                );
            }
        }
        TaskAction::Toggle { id } => {
            let id = resolve_id(&dash.state().tasks, &id)?;
            dash.toggle_task(&id);
            let done = dash.state().tasks.iter().any(|t| t.id == id && t.done);
            println!("Task {}: {}", short_id(&id), if done { "done" } else { "pending" });
        }
        TaskAction::Done { id } => {
            let id = resolve_id(&dash.state().tasks, &id)?;
            let already_done = dash.state().tasks.iter().any(|t| t.id == id && t.done);
            if already_done {
                println!("Task {} was already done", short_id(&id));
            } else {
                dash.set_task_done(&id, true);
                println!("Task {} done", short_id(&id));
            }
        }
        TaskAction::Delete { id } => {
            let id = resolve_id(&dash.state().tasks, &id)?;
            dash.delete_task(&id);
            println!("Task deleted: {}", short_id(&id));
        }
    }

    finish(&mut dash)
}
