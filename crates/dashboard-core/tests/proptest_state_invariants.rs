//! Property-based tests for the state model and trackers.
//!
//! 1. Any state built through tracker and timer operations survives a
//!    snapshot round trip unchanged.
//! 2. Every successful add grows its collection by one with a fresh id.
//! 3. Toggling the same habit day twice restores the week.
//! 4. Decoding arbitrary text never panics and always yields a valid state.

use chrono::NaiveDate;
use dashboard_core::state::{load_or_default, serialize};
use dashboard_core::tracker::{habit, note, task};
use dashboard_core::{RootState, TimerEngine};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    AddTask(String),
    ToggleTask(usize),
    DeleteTask(usize),
    AddNote(String),
    DeleteNote(usize),
    AddHabit(String),
    ToggleHabitDay(usize, u32),
    StartTimer,
    Tick(i64),
    PauseTimer,
    SetDurations(Option<i64>, Option<i64>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let text = "[ a-z]{0,12}";
    prop_oneof![
        text.prop_map(Op::AddTask),
        any::<usize>().prop_map(Op::ToggleTask),
        any::<usize>().prop_map(Op::DeleteTask),
        text.prop_map(Op::AddNote),
        any::<usize>().prop_map(Op::DeleteNote),
        text.prop_map(Op::AddHabit),
        (any::<usize>(), 0u32..60).prop_map(|(i, d)| Op::ToggleHabitDay(i, d)),
        Just(Op::StartTimer),
        (0i64..4_000_000).prop_map(Op::Tick),
        Just(Op::PauseTimer),
        (any::<Option<i64>>(), any::<Option<i64>>()).prop_map(|(w, b)| Op::SetDurations(w, b)),
    ]
}

fn pick<T>(items: &[T], i: usize) -> Option<&T> {
    if items.is_empty() {
        None
    } else {
        items.get(i % items.len())
    }
}

fn apply(state: &mut RootState, engine: &TimerEngine, now: &mut i64, op: Op) {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    match op {
        Op::AddTask(text) => {
            task::add(&mut state.tasks, &text, *now);
        }
        Op::ToggleTask(i) => {
            if let Some(id) = pick(&state.tasks, i).map(|t| t.id.clone()) {
                task::toggle(&mut state.tasks, &id);
            }
        }
        Op::DeleteTask(i) => {
            if let Some(id) = pick(&state.tasks, i).map(|t| t.id.clone()) {
                task::delete(&mut state.tasks, &id);
            }
        }
        Op::AddNote(text) => {
            note::add(&mut state.notes, &text, *now);
        }
        Op::DeleteNote(i) => {
            if let Some(id) = pick(&state.notes, i).map(|n| n.id.clone()) {
                note::delete(&mut state.notes, &id);
            }
        }
        Op::AddHabit(name) => {
            habit::add(&mut state.habits, &name);
        }
        Op::ToggleHabitDay(i, d) => {
            if let Some(id) = pick(&state.habits, i).map(|h| h.id.clone()) {
                habit::toggle_day(&mut state.habits, &id, base + chrono::Duration::days(d.into()));
            }
        }
        Op::StartTimer => {
            engine.start(&mut state.timer, *now);
        }
        Op::Tick(ms) => {
            *now += ms;
            engine.tick(&mut state.timer, *now);
        }
        Op::PauseTimer => {
            engine.pause(&mut state.timer, *now);
        }
        Op::SetDurations(w, b) => {
            engine.set_durations(&mut state.timer, w, b, *now);
        }
    }
}

proptest! {
    #[test]
    fn reachable_states_round_trip(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let engine = TimerEngine::default();
        let mut state = RootState::default();
        let mut now = 1_700_000_000_000i64;
        for op in ops {
            apply(&mut state, &engine, &mut now, op);
        }
        prop_assert_eq!(load_or_default(Some(&serialize(&state))), state);
    }
}

proptest! {
    #[test]
    fn adds_grow_by_one_with_fresh_ids(texts in prop::collection::vec("[a-z]{1,8}", 1..30)) {
        let mut state = RootState::default();
        let mut seen = HashSet::new();
        for (i, text) in texts.iter().enumerate() {
            let before = state.tasks.len();
            let id = task::add(&mut state.tasks, text, i as i64).unwrap();
            prop_assert_eq!(state.tasks.len(), before + 1);
            prop_assert!(seen.insert(id));
        }
        let ids: HashSet<_> = state.tasks.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids.len(), state.tasks.len());
    }
}

proptest! {
    #[test]
    fn habit_toggle_is_an_involution(
        marked in prop::collection::vec(0u32..30, 0..10),
        target in 0u32..30,
    ) {
        let base = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut habits = Vec::new();
        let id = habit::add(&mut habits, "Walk").unwrap();
        for d in marked {
            habit::toggle_day(&mut habits, &id, base + chrono::Duration::days(d.into()));
        }
        let before = habits[0].week.clone();
        let day = base + chrono::Duration::days(target.into());
        habit::toggle_day(&mut habits, &id, day);
        habit::toggle_day(&mut habits, &id, day);
        prop_assert_eq!(&habits[0].week, &before);
    }
}

proptest! {
    #[test]
    fn arbitrary_input_decodes_to_valid_state(raw in ".{0,200}") {
        let state = load_or_default(Some(&raw));
        prop_assert!((1..=120).contains(&state.timer.work_minutes));
        prop_assert!((1..=60).contains(&state.timer.break_minutes));
        prop_assert!(state.timer.remaining_seconds > 0);
    }
}
