//! Custom workouts: intervals, the live editor and saved templates

pub mod editor;
pub mod interval;
pub mod store;

pub use editor::{IntervalEditor, IntervalPatch};
pub use interval::{Interval, PhaseKind, MIN_INTERVAL_SECONDS};
pub use store::SavedWorkout;
