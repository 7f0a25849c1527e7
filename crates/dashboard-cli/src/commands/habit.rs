//! Weekly habit tracker commands for CLI.

use clap::Subcommand;
use dashboard_core::{view, Config};
use serde::Serialize;

use super::{finish, open_dashboard, resolve_id, short_id, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit
    Add {
        /// Habit name
        name: String,
    },
    /// Show each habit with the last seven days
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark or unmark a day (today by default)
    Toggle {
        /// Habit ID (a unique prefix is enough)
        id: String,
        /// Day as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a habit
    Delete {
        /// Habit ID (a unique prefix is enough)
        id: String,
    },
}

#[derive(Serialize)]
struct HabitRow<'a> {
    id: &'a str,
    name: &'a str,
    days: Vec<DayCell>,
}

#[derive(Serialize)]
struct DayCell {
    date: String,
    done: bool,
}

pub fn run(action: HabitAction) -> CliResult {
    let config = Config::load_or_default();
    let mut dash = open_dashboard(&config)?;

    match action {
        HabitAction::Add { name } => match dash.add_habit(&name) {
            Some(id) => println!("Habit added: {}", short_id(&id)),
            None => return Err("habit name is empty".into()),
        },
        HabitAction::List { json } => {
            let today = view::today();
            let habits = &dash.state().habits;
            if json {
                let rows: Vec<HabitRow<'_>> = habits
                    .iter()
                    .map(|habit| HabitRow {
                        id: &habit.id,
                        name: &habit.name,
                        days: view::habit_strip(habit, today)
                            .iter()
                            .map(|(day, done)| DayCell {
                                date: view::date_key(*day),
                                done: *done,
                            })
                            .collect(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if habits.is_empty() {
                println!("No habits.");
            } else {
                let header: String = view::last_seven_days(today)
                    .iter()
                    .map(|day| format!("{} ", day.format("%a").to_string().chars().next().unwrap_or(' ')))
                    .collect();
                println!("{:<8}  {:<20} {}", "", "", header.trim_end());
                for habit in habits {
                    let strip: String = view::habit_strip(habit, today)
                        .iter()
                        .map(|(_, done)| if *done { "■ " } else { "· " })
                        .collect();
                    println!("{:<8}  {:<20} {}", short_id(&habit.id), habit.name, strip.trim_end());
                }
            }
        }
        HabitAction::Toggle { id, date } => {
            let id = resolve_id(&dash.state().habits, &id)?;
            let day = match date {
                Some(raw) => view::parse_date_key(&raw)
                    .ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?,
                None => view::today(),
            };
            match dash.toggle_habit_day(&id, day) {
                Some(true) => println!("{} marked done", view::date_key(day)),
                Some(false) => println!("{} unmarked", view::date_key(day)),
                None => return Err(format!("no habit with id '{id}'").into()),
            }
        }
        HabitAction::Delete { id } => {
            let id = resolve_id(&dash.state().habits, &id)?;
            dash.delete_habit(&id);
            println!("Habit deleted: {}", short_id(&id));
        }
    }

    finish(&mut dash)
}
