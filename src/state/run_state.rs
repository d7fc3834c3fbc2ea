//! Published view of the running timer

use serde::Serialize;

use crate::{
    engine::{Countdown, Cue, Mode, SettleToken, Step, ToneSpec},
    utils::format::format_big_time,
};

/// Point-in-time copy of the countdown, sent to watchers after every change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub mode: Mode,
    /// Which timer is running ("hiit" or "custom")
    pub workout: Option<&'static str>,
    pub remaining: u32,
    /// Big clock text: two-digit seconds below 100, MM:SS above
    pub display: String,
    pub is_prestart: bool,
    pub settling: bool,
    pub current: Option<Step>,
    pub elapsed_seconds: u64,
    #[serde(skip)]
    pub run_epoch: u64,
    #[serde(skip)]
    pub settle_token: Option<SettleToken>,
}

impl RunSnapshot {
    pub fn of(countdown: &Countdown) -> Self {
        Self {
            mode: countdown.mode(),
            workout: countdown.source_name(),
            remaining: countdown.remaining(),
            display: format_big_time(countdown.remaining()),
            is_prestart: countdown.is_prestart(),
            settling: countdown.is_settling(),
            current: countdown.current().cloned(),
            elapsed_seconds: countdown.elapsed_seconds(),
            run_epoch: countdown.run_epoch(),
            settle_token: countdown.pending_settle(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }
}

impl Default for RunSnapshot {
    fn default() -> Self {
        Self::of(&Countdown::new())
    }
}

/// Everything pushed to event-stream clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    Run(RunSnapshot),
    Tone { cue: Cue, tone: ToneSpec },
    Vibrate { cue: Cue, pattern: Vec<u32> },
}

impl ServerEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Run(_) => "run",
            ServerEvent::Tone { .. } => "tone",
            ServerEvent::Vibrate { .. } => "vibrate",
        }
    }
}
