use serde::{Deserialize, Serialize};

use super::{clean_text, fresh_id, remove_by_id, Identified};

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// Creation time in epoch milliseconds.
    #[serde(default, alias = "created_at")]
    pub created_at: i64,
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Append a new open task. Blank text is ignored.
pub fn add(tasks: &mut Vec<Task>, text: &str, now_ms: i64) -> Option<String> {
    let text = clean_text(text)?;
    let id = fresh_id(tasks);
    tasks.push(Task {
        id: id.clone(),
        text,
        done: false,
        created_at: now_ms,
    });
    Some(id)
}

/// Flip `done`. Returns `false` if no task has this id.
pub fn toggle(tasks: &mut [Task], id: &str) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.done = !task.done;
            true
        }
        None => false,
    }
}

/// Set `done` explicitly, as a checkbox does.
pub fn set_done(tasks: &mut [Task], id: &str, done: bool) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.done = done;
            true
        }
        None => false,
    }
}

pub fn delete(tasks: &mut Vec<Task>, id: &str) -> bool {
    remove_by_id(tasks, id)
}
