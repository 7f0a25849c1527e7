use serde::{Deserialize, Serialize};

use super::{clean_text, fresh_id, remove_by_id, Identified};

/// A free-form note. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub text: String,
    #[serde(default, alias = "created_at")]
    pub created_at: i64,
}

impl Identified for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn add(notes: &mut Vec<Note>, text: &str, now_ms: i64) -> Option<String> {
    let text = clean_text(text)?;
    let id = fresh_id(notes);
    notes.push(Note {
        id: id.clone(),
        text,
        created_at: now_ms,
    });
    Some(id)
}

pub fn delete(notes: &mut Vec<Note>, id: &str) -> bool {
    remove_by_id(notes, id)
}

/// Remove every note. Asking the user first is up to the caller.
pub fn clear(notes: &mut Vec<Note>) -> usize {
    let n = notes.len();
    notes.clear();
    n
}
