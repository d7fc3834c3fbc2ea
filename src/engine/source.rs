//! Phase sources: what the countdown runs through
//!
//! The engine only knows how to count down a step. Which step follows which
//! is decided here, either by a fixed work/rest round generator or by an
//! explicit interval list.

use serde::{Deserialize, Serialize};

use crate::workouts::{interval::is_runnable, Interval, PhaseKind};

/// Work or rest half of a fixed round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Work,
    Rest,
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Position {
    Round { round: u32, phase: RoundPhase },
    Index { index: usize },
}

/// A phase ready to be counted down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub position: Position,
    pub kind: PhaseKind,
    pub label: String,
    pub seconds: u32,
}

/// Anything that can hand the engine its steps in order
pub trait PhaseSource: Send + std::fmt::Debug {
    /// Whether a run can start at all
    fn is_runnable(&self) -> bool;

    /// The first real phase, entered after the pre-roll
    fn first(&self) -> Option<Step>;

    /// The phase following `current`, or `None` once the workout is done
    fn after(&self, current: Position) -> Option<Step>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Fixed-round HIIT configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub rounds: u32,
}

impl TimerConfig {
    pub const WORK_RANGE: (u32, u32) = (5, 600);
    pub const REST_RANGE: (u32, u32) = (0, 600);
    pub const ROUNDS_RANGE: (u32, u32) = (1, 50);

    pub fn new(work_seconds: u32, rest_seconds: u32, rounds: u32) -> Self {
        Self {
            work_seconds,
            rest_seconds,
            rounds,
        }
    }

    /// Normalise raw input the way the config form does
    pub fn clamped(work_seconds: u32, rest_seconds: u32, rounds: u32) -> Self {
        Self {
            work_seconds: work_seconds.clamp(Self::WORK_RANGE.0, Self::WORK_RANGE.1),
            rest_seconds: rest_seconds.clamp(Self::REST_RANGE.0, Self::REST_RANGE.1),
            rounds: rounds.clamp(Self::ROUNDS_RANGE.0, Self::ROUNDS_RANGE.1),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.work_seconds > 0 && self.rounds > 0
    }

    fn work(&self, round: u32) -> Step {
        Step {
            position: Position::Round {
                round,
                phase: RoundPhase::Work,
            },
            kind: PhaseKind::Work,
            label: "Work".to_string(),
            seconds: self.work_seconds,
        }
    }

    fn rest(&self, round: u32) -> Step {
        Step {
            position: Position::Round {
                round,
                phase: RoundPhase::Rest,
            },
            kind: PhaseKind::Rest,
            label: "Rest".to_string(),
            seconds: self.rest_seconds,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(20, 10, 8)
    }
}

impl PhaseSource for TimerConfig {
    fn is_runnable(&self) -> bool {
        self.is_valid()
    }

    fn first(&self) -> Option<Step> {
        self.is_valid().then(|| self.work(1))
    }

    fn after(&self, current: Position) -> Option<Step> {
        let Position::Round { round, phase } = current else {
            return None;
        };

        if phase == RoundPhase::Work && self.rest_seconds > 0 {
            return Some(self.rest(round));
        }
        (round < self.rounds).then(|| self.work(round + 1))
    }

    fn name(&self) -> &'static str {
        "hiit"
    }
}

/// Ordered interval list, snapshotted when the run starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSequence {
    intervals: Vec<Interval>,
}

impl IntervalSequence {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    fn step(&self, index: usize) -> Option<Step> {
        self.intervals.get(index).map(|it| Step {
            position: Position::Index { index },
            kind: it.kind,
            label: it.label.clone(),
            seconds: it.duration,
        })
    }
}

impl PhaseSource for IntervalSequence {
    fn is_runnable(&self) -> bool {
        is_runnable(&self.intervals)
    }

    fn first(&self) -> Option<Step> {
        self.step(0)
    }

    fn after(&self, current: Position) -> Option<Step> {
        match current {
            Position::Index { index } => self.step(index + 1),
            Position::Round { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}
