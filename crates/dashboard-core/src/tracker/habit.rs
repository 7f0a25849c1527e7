//! Habits and their per-day completion marks.
//!
//! A habit's week is a set of local calendar days. On the wire it is a map
//! from `YYYY-MM-DD` to `true`; an absent day means "not done", and `false`
//! is never written.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{clean_text, fresh_id, remove_by_id, Identified};
use crate::view::{date_key, parse_date_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub week: HabitWeek,
}

impl Identified for Habit {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Days on which a habit was marked done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitWeek {
    days: BTreeSet<NaiveDate>,
}

impl HabitWeek {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    /// Flip the mark for `day`; returns whether it is now marked.
    pub fn toggle(&mut self, day: NaiveDate) -> bool {
        if self.days.remove(&day) {
            false
        } else {
            self.days.insert(day);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Marked days, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HabitWeek {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl Serialize for HabitWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&date_key(*day), &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HabitWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WeekVisitor;

        impl<'de> Visitor<'de> for WeekVisitor {
            type Value = HabitWeek;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of YYYY-MM-DD keys to true")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<HabitWeek, A::Error> {
                let mut week = HabitWeek::default();
                while let Some((key, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    // Entries that are not a real date marked `true` carry no mark.
                    match (parse_date_key(&key), value) {
                        (Some(day), serde_json::Value::Bool(true)) => {
                            week.days.insert(day);
                        }
                        _ => tracing::debug!(key = %key, "dropping habit week entry"),
                    }
                }
                Ok(week)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<HabitWeek, E> {
                Ok(HabitWeek::default())
            }
        }

        deserializer.deserialize_any(WeekVisitor)
    }
}

pub fn add(habits: &mut Vec<Habit>, name: &str) -> Option<String> {
    let name = clean_text(name)?;
    let id = fresh_id(habits);
    habits.push(Habit {
        id: id.clone(),
        name,
        week: HabitWeek::default(),
    });
    Some(id)
}

/// Flip the mark for `day` on habit `id`.
///
/// Returns the new marked state, or `None` if no habit has this id.
pub fn toggle_day(habits: &mut [Habit], id: &str, day: NaiveDate) -> Option<bool> {
    habits
        .iter_mut()
        .find(|h| h.id == id)
        .map(|habit| habit.week.toggle(day))
}

pub fn delete(habits: &mut Vec<Habit>, id: &str) -> bool {
    remove_by_id(habits, id)
}
