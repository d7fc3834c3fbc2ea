//! Saved workout persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::interval::{is_runnable, Interval};
use crate::{
    error::{AppError, AppResult},
    storage::LocalStore,
};

pub const SAVED_WORKOUTS_KEY: &str = "monyfit_saved_custom_workouts_v1";

/// A named snapshot of an interval list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWorkout {
    pub id: String,
    pub name: String,
    pub intervals: Vec<Interval>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Saved workouts, most recent first. Unreadable data counts as none.
pub fn list(store: &LocalStore) -> Vec<SavedWorkout> {
    store
        .get_json::<Vec<SavedWorkout>>(SAVED_WORKOUTS_KEY)
        .unwrap_or_default()
}

pub fn find(store: &LocalStore, id: &str) -> AppResult<SavedWorkout> {
    list(store)
        .into_iter()
        .find(|w| w.id == id)
        .ok_or_else(|| AppError::UnknownWorkout(id.to_string()))
}

/// Snapshot `intervals` under `name` and prepend it to the saved list
pub fn save(store: &mut LocalStore, name: &str, intervals: &[Interval]) -> AppResult<SavedWorkout> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::EmptyName);
    }
    if !is_runnable(intervals) {
        return Err(AppError::InvalidConfig);
    }

    let created_at = Utc::now();
    let suffix = Uuid::new_v4().simple().to_string();
    let workout = SavedWorkout {
        id: format!("{}_{}", created_at.timestamp_millis(), &suffix[..6]),
        name: name.to_string(),
        intervals: intervals.to_vec(),
        created_at,
    };

    let mut saved = list(store);
    saved.insert(0, workout.clone());
    store.set_json(SAVED_WORKOUTS_KEY, &saved)?;

    info!("Saved workout '{}' ({} intervals)", workout.name, workout.intervals.len());
    Ok(workout)
}

/// Remove a saved workout; unknown ids leave the list untouched
pub fn delete(store: &mut LocalStore, id: &str) -> AppResult<bool> {
    let mut saved = list(store);
    let before = saved.len();
    saved.retain(|w| w.id != id);
    if saved.len() == before {
        return Ok(false);
    }

    store.set_json(SAVED_WORKOUTS_KEY, &saved)?;
    info!("Deleted saved workout {}", id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::workouts::{interval::total_seconds, IntervalEditor, PhaseKind};

    fn leg_day() -> Vec<Interval> {
        vec![
            Interval::new(1, PhaseKind::Prepare, "Prepare", 10),
            Interval::new(2, PhaseKind::Work, "Squats", 40),
            Interval::new(3, PhaseKind::Rest, "Rest", 20),
        ]
    }

    #[test]
    fn save_prepends_and_trims_name() {
        let mut store = LocalStore::in_memory();
        let first = save(&mut store, "Leg Day", &leg_day()).unwrap();
        let second = save(&mut store, "  Arms  ", &leg_day()).unwrap();

        assert_eq!(second.name, "Arms");
        let names: Vec<_> = list(&store).into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["Arms", "Leg Day"]);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut store = LocalStore::in_memory();
        assert!(matches!(save(&mut store, "   ", &leg_day()), Err(AppError::EmptyName)));
        assert!(list(&store).is_empty());
    }

    #[test]
    fn empty_interval_lists_are_rejected() {
        let mut store = LocalStore::in_memory();
        assert!(matches!(save(&mut store, "Nothing", &[]), Err(AppError::InvalidConfig)));
    }

    #[test]
    fn loaded_copy_is_independent_of_saved_record() {
        let mut store = LocalStore::in_memory();
        let saved = save(&mut store, "Leg Day", &leg_day()).unwrap();

        let mut editor = IntervalEditor::new();
        editor.add(PhaseKind::Work);
        editor.replace(&find(&store, &saved.id).unwrap().intervals);

        let loaded = editor.intervals().to_vec();
        assert_eq!(loaded.len(), 3);
        for (copy, original) in loaded.iter().zip(leg_day().iter()) {
            assert!(copy.same_content(original));
        }
        let ids: HashSet<_> = loaded.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), loaded.len());

        editor.step_duration(2, 5).unwrap();
        editor.remove(3).unwrap();
        assert_eq!(find(&store, &saved.id).unwrap().intervals, leg_day());
    }

    #[test]
    fn deleting_unknown_id_is_noop() {
        let mut store = LocalStore::in_memory();
        save(&mut store, "Leg Day", &leg_day()).unwrap();
        assert!(!delete(&mut store, "nope").unwrap());
        assert_eq!(list(&store).len(), 1);
    }

    #[test]
    fn delete_removes_by_id() {
        let mut store = LocalStore::in_memory();
        let saved = save(&mut store, "Leg Day", &leg_day()).unwrap();
        assert!(delete(&mut store, &saved.id).unwrap());
        assert!(list(&store).is_empty());
    }

    #[test]
    fn corrupt_saved_list_reads_as_empty() {
        let mut store = LocalStore::in_memory();
        store.set(SAVED_WORKOUTS_KEY, "{\"oops\": true}").unwrap();
        assert!(list(&store).is_empty());
    }

    #[test]
    fn reads_records_written_by_the_browser_app() {
        let mut store = LocalStore::in_memory();
        store
            .set(
                SAVED_WORKOUTS_KEY,
                r#"[{"id":"1700000000000_ab12cd","name":"Core","createdAt":1700000000000,
                    "intervals":[{"id":1,"type":"work","label":"Plank","duration":45}]}]"#,
            )
            .unwrap();
        let saved = list(&store);
        assert_eq!(saved[0].name, "Core");
        assert_eq!(saved[0].created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(total_seconds(&saved[0].intervals), 45);
    }
}
