use clap::Subcommand;
use dashboard_core::{view, Config};

use super::{confirm, finish, open_dashboard, resolve_id, short_id, CliResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        /// Note text
        text: String,
    },
    /// List notes, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a note
    Delete {
        /// Note ID (a unique prefix is enough)
        id: String,
    },
    /// Delete every note
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: NoteAction) -> CliResult {
    let config = Config::load_or_default();
    let mut dash = open_dashboard(&config)?;

    match action {
        NoteAction::Add { text } => match dash.add_note(&text) {
            Some(id) => println!("Note added: {}", short_id(&id)),
            None => return Err("note text is empty".into()),
        },
        NoteAction::List { json } => {
            let notes: Vec<_> = view::notes_newest_first(&dash.state().notes).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if notes.is_empty() {
                println!("No notes.");
            } else {
                for note in notes {
                    println!("{}  {}", short_id(&note.id), note.text);
                }
            }
        }
        NoteAction::Delete { id } => {
            let id = resolve_id(&dash.state().notes, &id)?;
            dash.delete_note(&id);
            println!("Note deleted: {}", short_id(&id));
        }
        NoteAction::Clear { yes } => {
            if dash.state().notes.is_empty() {
                println!("No notes.");
            } else if yes || confirm("Delete all notes?")? {
                let removed = dash.clear_notes();
                println!("Deleted {removed} notes");
            } else {
                println!("Cancelled");
            }
        }
    }

    finish(&mut dash)
}
