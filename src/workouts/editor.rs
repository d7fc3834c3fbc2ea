//! Live interval list edited before a custom workout starts

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interval::{Interval, PhaseKind, MIN_INTERVAL_SECONDS};
use crate::error::{AppError, AppResult};

/// Partial update applied to a single interval
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervalPatch {
    pub kind: Option<PhaseKind>,
    pub label: Option<String>,
    pub duration: Option<u32>,
}

/// Ordered interval list with its own id generator
#[derive(Debug, Clone)]
pub struct IntervalEditor {
    intervals: Vec<Interval>,
    next_id: u32,
}

impl IntervalEditor {
    /// Editor with the starter routine: prepare, work, rest
    pub fn new() -> Self {
        Self {
            intervals: vec![
                Interval::new(1, PhaseKind::Prepare, "Prepare", 10),
                Interval::new(2, PhaseKind::Work, "Work", 20),
                Interval::new(3, PhaseKind::Rest, "Rest", 10),
            ],
            next_id: 4,
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Append an interval with the defaults for its kind
    pub fn add(&mut self, kind: PhaseKind) -> &Interval {
        let id = self.allocate_id();
        self.intervals.push(Interval::new(
            id,
            kind,
            kind.default_label(),
            kind.default_duration(),
        ));
        debug!("Added {:?} interval {}", kind, id);
        &self.intervals[self.intervals.len() - 1]
    }

    pub fn update(&mut self, id: u32, patch: IntervalPatch) -> AppResult<&Interval> {
        let interval = self.find_mut(id)?;
        if let Some(kind) = patch.kind {
            interval.kind = kind;
        }
        if let Some(label) = patch.label {
            interval.label = label;
        }
        if let Some(duration) = patch.duration {
            interval.duration = duration.max(MIN_INTERVAL_SECONDS);
        }
        Ok(&*interval)
    }

    /// The +/- stepper; never drops below the minimum duration
    pub fn step_duration(&mut self, id: u32, delta: i32) -> AppResult<&Interval> {
        let interval = self.find_mut(id)?;
        let stepped = i64::from(interval.duration) + i64::from(delta);
        interval.duration = stepped
            .clamp(i64::from(MIN_INTERVAL_SECONDS), i64::from(u32::MAX)) as u32;
        Ok(&*interval)
    }

    pub fn remove(&mut self, id: u32) -> AppResult<Interval> {
        let index = self.position(id)?;
        Ok(self.intervals.remove(index))
    }

    /// Drag-and-drop: the dragged interval takes the target's slot.
    ///
    /// Dragging onto itself leaves the list untouched.
    pub fn move_to(&mut self, dragged: u32, target: u32) -> AppResult<()> {
        let from = self.position(dragged)?;
        let to = self.position(target)?;
        if from == to {
            return Ok(());
        }
        let moved = self.intervals.remove(from);
        self.intervals.insert(to, moved);
        debug!("Moved interval {} from {} to {}", dragged, from, to);
        Ok(())
    }

    /// Replace the whole list, renumbering ids from 1.
    ///
    /// Durations below the minimum are raised to it.
    pub fn replace(&mut self, intervals: &[Interval]) {
        let mut next_id = 1;
        self.intervals = intervals
            .iter()
            .map(|it| {
                let rebuilt = Interval {
                    id: next_id,
                    duration: it.duration.max(MIN_INTERVAL_SECONDS),
                    ..it.clone()
                };
                next_id += 1;
                rebuilt
            })
            .collect();
        self.next_id = next_id;
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn position(&self, id: u32) -> AppResult<usize> {
        self.intervals
            .iter()
            .position(|it| it.id == id)
            .ok_or(AppError::UnknownInterval(id))
    }

    fn find_mut(&mut self, id: u32) -> AppResult<&mut Interval> {
        self.intervals
            .iter_mut()
            .find(|it| it.id == id)
            .ok_or(AppError::UnknownInterval(id))
    }
}

impl Default for IntervalEditor {
    fn default() -> Self {
        Self::new()
    }
}
