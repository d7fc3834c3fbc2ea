//! Interval model for custom workouts

use serde::{Deserialize, Serialize};

/// Shortest duration the editor allows for a single interval
pub const MIN_INTERVAL_SECONDS: u32 = 5;

/// Kind of phase an interval represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Prepare,
    Work,
    Rest,
    LongBreak,
    Custom,
}

impl PhaseKind {
    /// Label given to a freshly added interval of this kind
    pub fn default_label(&self) -> &'static str {
        match self {
            PhaseKind::Prepare => "Prepare",
            PhaseKind::Work => "Work",
            PhaseKind::Rest => "Rest",
            PhaseKind::LongBreak => "Long break",
            PhaseKind::Custom => "Custom exercise",
        }
    }

    /// Duration given to a freshly added interval of this kind
    pub fn default_duration(&self) -> u32 {
        match self {
            PhaseKind::Prepare => 10,
            PhaseKind::Rest => 15,
            _ => 20,
        }
    }
}

/// One step of a custom workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: PhaseKind,
    pub label: String,
    /// Seconds
    pub duration: u32,
}

impl Interval {
    pub fn new(id: u32, kind: PhaseKind, label: impl Into<String>, duration: u32) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            duration: duration.max(MIN_INTERVAL_SECONDS),
        }
    }

    /// Same kind, label and duration, ignoring the id
    pub fn same_content(&self, other: &Interval) -> bool {
        self.kind == other.kind && self.label == other.label && self.duration == other.duration
    }
}

/// Sum of all interval durations in seconds
pub fn total_seconds(intervals: &[Interval]) -> u64 {
    intervals.iter().map(|i| u64::from(i.duration)).sum()
}

/// A list can run when it has at least one interval and some time in it
pub fn is_runnable(intervals: &[Interval]) -> bool {
    !intervals.is_empty() && total_seconds(intervals) > 0
}
