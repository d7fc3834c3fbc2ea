//! External capability collaborators
//!
//! Audio and vibration output live here, behind the `CueSink` trait.

pub mod cues;

pub use cues::{CueError, CuePlayer, CueSettings, CueSink, EventStreamSink, LogSink, TerminalBell};
