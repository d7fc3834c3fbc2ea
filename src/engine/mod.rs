//! Interval timer engine
//!
//! One countdown state machine shared by the fixed-round HIIT timer and the
//! custom interval sequence, plus the cue descriptions it emits.

pub mod countdown;
pub mod cues;
pub mod source;

pub use countdown::{Countdown, Mode, SettleToken, PRESTART_SECONDS, SETTLE_DELAY};
pub use cues::{Cue, ToneSpec};
pub use source::{IntervalSequence, PhaseSource, Position, RoundPhase, Step, TimerConfig};
