//! Snapshot encoding, decoding and import merging.
//!
//! Decoding never fails on stored data: anything unreadable falls back to the
//! schema defaults, field by field. Only [`parse_import`] reports errors,
//! because a rejected import file must leave the current state alone.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::RootState;
use crate::error::ImportError;
use crate::timer::TimerState;
use crate::tracker::{Habit, Note, Task};

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "productivity-dashboard-export.json";

/// Stored key first, then accepted aliases.
const TASK_KEYS: &[&str] = &["todos", "tasks"];
const NOTE_KEYS: &[&str] = &["notes"];
const HABIT_KEYS: &[&str] = &["habits"];
const TIMER_KEYS: &[&str] = &["pomodoro", "timer"];

/// The top-level fields of an imported document that decoded cleanly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRootState {
    pub tasks: Option<Vec<Task>>,
    pub notes: Option<Vec<Note>>,
    pub habits: Option<Vec<Habit>>,
    pub timer: Option<TimerState>,
}

impl PartialRootState {
    /// Decode each known top-level field independently. A field that is
    /// missing or does not have the expected shape is left as `None`.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        Self {
            tasks: field(object, TASK_KEYS, Shape::Records),
            notes: field(object, NOTE_KEYS, Shape::Records),
            habits: field(object, HABIT_KEYS, Shape::Records),
            timer: field(object, TIMER_KEYS, Shape::Record),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_none() && self.notes.is_none() && self.habits.is_none() && self.timer.is_none()
    }
}

/// JSON shape a top-level field must have before it is decoded. serde
/// would otherwise accept a struct written as an array, by position.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Record,
    Records,
}

impl Shape {
    fn matches(self, value: &Value) -> bool {
        match self {
            Shape::Record => value.is_object(),
            Shape::Records => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, keys: &[&str], shape: Shape) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|key| object.get(*key).map(|value| (*key, value)))?;
    if !shape.matches(value) {
        tracing::warn!(field = key, kind = json_kind(value), "ignoring field with the wrong shape");
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(field = key, "ignoring ill-typed field: {e}");
            None
        }
    }
}

/// Shallow merge: each top-level field present in `imported` replaces the
/// one in `base`. Items inside a collection are never reconciled.
pub fn merge(base: RootState, imported: PartialRootState) -> RootState {
    let mut merged = RootState {
        tasks: imported.tasks.unwrap_or(base.tasks),
        notes: imported.notes.unwrap_or(base.notes),
        habits: imported.habits.unwrap_or(base.habits),
        timer: imported.timer.unwrap_or(base.timer),
    };
    merged.normalize();
    merged
}

/// Rebuild the Root State from a stored snapshot.
///
/// Missing, unparseable or non-object input yields the defaults; a
/// well-formed object with some bad fields keeps the good ones.
pub fn load_or_default(raw: Option<&str>) -> RootState {
    let Some(raw) = raw else {
        return RootState::default();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => merge(RootState::default(), PartialRootState::from_json(&object)),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "stored snapshot is not an object; using defaults");
            RootState::default()
        }
        Err(e) => {
            tracing::warn!("stored snapshot is unreadable; using defaults: {e}");
            RootState::default()
        }
    }
}

/// Compact encoding used for snapshots.
pub fn serialize(state: &RootState) -> String {
    // A RootState has string keys and plain values only.
    serde_json::to_string(state).unwrap_or_else(|_| String::from("{}"))
}

/// Pretty-printed encoding offered as a download.
pub fn export_pretty(state: &RootState) -> String {
    serde_json::to_string_pretty(state).unwrap_or_else(|_| String::from("{}"))
}

/// Strict parse of an import file.
pub fn parse_import(bytes: &[u8]) -> Result<PartialRootState, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ImportError::NotUtf8)?;
    match serde_json::from_str::<Value>(text)? {
        Value::Object(object) => Ok(PartialRootState::from_json(&object)),
        _ => Err(ImportError::NotAnObject),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
