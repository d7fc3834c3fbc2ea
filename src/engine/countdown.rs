//! Countdown engine and phase sequencer
//!
//! The engine is a plain state machine with no clock of its own. A driver
//! feeds it one `tick` per elapsed second and, after a zero crossing, hands
//! back the settle token once the standby delay has passed. Both inputs carry
//! an identity (run epoch, settle token) so callbacks from a superseded timer
//! are rejected here instead of mutating a newer run.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    cues::{countdown_cue, Cue},
    source::{PhaseSource, Step},
};
use crate::error::{AppError, AppResult};

/// Every run opens with a 3-2-1 pre-roll
pub const PRESTART_SECONDS: u32 = 3;

/// Standby at 00 between a zero crossing and the next phase
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Editing,
    Running,
    Paused,
    Finished,
}

/// Identifies one pending settle; a new crossing or a resume gets a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettleToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Counting,
    /// Holding at zero. The token is dropped while paused and re-issued on resume.
    Settling { token: Option<SettleToken> },
}

/// The shared countdown behind both the HIIT and custom workout timers
#[derive(Debug)]
pub struct Countdown {
    mode: Mode,
    remaining: u32,
    is_prestart: bool,
    stage: Stage,
    source: Option<Box<dyn PhaseSource>>,
    current: Option<Step>,
    run_epoch: u64,
    next_token: u64,
    elapsed_seconds: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            mode: Mode::Editing,
            remaining: 0,
            is_prestart: false,
            stage: Stage::Idle,
            source: None,
            current: None,
            run_epoch: 0,
            next_token: 0,
            elapsed_seconds: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_prestart(&self) -> bool {
        self.is_prestart
    }

    /// Phase being counted, or about to be entered during the pre-roll
    pub fn current(&self) -> Option<&Step> {
        self.current.as_ref()
    }

    pub fn source_name(&self) -> Option<&'static str> {
        self.source.as_ref().map(|s| s.name())
    }

    /// Bumped every time the run (re)enters `Running`
    pub fn run_epoch(&self) -> u64 {
        self.run_epoch
    }

    /// Seconds counted in real phases, pre-roll excluded
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Token the driver should wait on, if a settle is armed right now
    pub fn pending_settle(&self) -> Option<SettleToken> {
        match (self.mode, self.stage) {
            (Mode::Running, Stage::Settling { token }) => token,
            _ => None,
        }
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.stage, Stage::Settling { .. })
    }

    /// Begin a run with the 3-second pre-roll
    pub fn start(&mut self, source: Box<dyn PhaseSource>) -> AppResult<Vec<Cue>> {
        if self.mode != Mode::Editing {
            return Err(AppError::NotEditing);
        }
        if !source.is_runnable() {
            return Err(AppError::InvalidConfig);
        }
        let first = source.first().ok_or(AppError::InvalidConfig)?;

        info!("Starting {} workout", source.name());
        self.mode = Mode::Running;
        self.is_prestart = true;
        self.remaining = PRESTART_SECONDS;
        self.stage = Stage::Counting;
        self.current = Some(first);
        self.source = Some(source);
        self.elapsed_seconds = 0;
        self.run_epoch += 1;

        Ok(countdown_cue(self.remaining, self.mode).into_iter().collect())
    }

    /// One elapsed second from the ticker created for `epoch`
    pub fn tick(&mut self, epoch: u64) -> Vec<Cue> {
        if self.mode != Mode::Running || self.stage != Stage::Counting {
            return Vec::new();
        }
        if epoch != self.run_epoch {
            debug!("Ignoring tick from stale ticker (epoch {} != {})", epoch, self.run_epoch);
            return Vec::new();
        }
        if self.remaining == 0 {
            return Vec::new();
        }

        self.remaining -= 1;
        if !self.is_prestart {
            self.elapsed_seconds += 1;
        }

        if self.remaining == 0 {
            let token = self.issue_token();
            self.stage = Stage::Settling { token: Some(token) };
            debug!("Reached zero, settling with {:?}", token);
            return vec![Cue::Long];
        }

        countdown_cue(self.remaining, self.mode).into_iter().collect()
    }

    /// Apply the transition for a zero crossing once its settle delay is over
    pub fn settle(&mut self, token: SettleToken) -> Vec<Cue> {
        if self.pending_settle() != Some(token) {
            debug!("Ignoring stale settle {:?}", token);
            return Vec::new();
        }

        let next = match &self.source {
            Some(source) if self.is_prestart => source.first(),
            Some(source) => self.current.as_ref().and_then(|step| source.after(step.position)),
            None => None,
        };
        self.is_prestart = false;

        match next {
            Some(step) => {
                debug!("Entering {} ({}s)", step.label, step.seconds);
                self.remaining = step.seconds;
                self.current = Some(step);
                self.stage = Stage::Counting;
                countdown_cue(self.remaining, self.mode).into_iter().collect()
            }
            None => {
                info!("Workout finished after {}s", self.elapsed_seconds);
                self.mode = Mode::Finished;
                self.remaining = 0;
                self.current = None;
                self.stage = Stage::Idle;
                vec![Cue::End]
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.mode != Mode::Running {
            return false;
        }
        self.mode = Mode::Paused;
        if let Stage::Settling { token } = &mut self.stage {
            *token = None;
        }
        true
    }

    /// Resume a paused run; a settle that was pending restarts from scratch.
    ///
    /// Returns `None` when not paused. Resuming at 3, 2 or 1 beeps again,
    /// since the countdown cue follows `(remaining, mode)`.
    pub fn resume(&mut self) -> Option<Vec<Cue>> {
        if self.mode != Mode::Paused {
            return None;
        }
        self.mode = Mode::Running;
        self.run_epoch += 1;
        match self.stage {
            Stage::Settling { token: None } => {
                let token = self.issue_token();
                self.stage = Stage::Settling { token: Some(token) };
                Some(Vec::new())
            }
            Stage::Counting => Some(countdown_cue(self.remaining, self.mode).into_iter().collect()),
            _ => Some(Vec::new()),
        }
    }

    /// Back to editing from any state
    pub fn reset(&mut self) {
        self.mode = Mode::Editing;
        self.remaining = 0;
        self.is_prestart = false;
        self.stage = Stage::Idle;
        self.current = None;
        self.source = None;
        self.elapsed_seconds = 0;
    }

    fn issue_token(&mut self) -> SettleToken {
        self.next_token += 1;
        SettleToken(self.next_token)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
