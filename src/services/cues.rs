//! Cue output: turns engine cues into sounds and vibrations
//!
//! Sinks are capability-gated collaborators. A sink that cannot render a cue
//! reports an error, and the player logs it and moves on. Cue failures never
//! reach the timer.

use std::{
    io::Write,
    sync::Mutex,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    engine::{Cue, ToneSpec},
    state::ServerEvent,
};

#[derive(Debug, Error)]
pub enum CueError {
    #[error("{0} is not supported by this sink")]
    Unsupported(&'static str),

    #[error("no listeners connected")]
    NoListeners,

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Something that can render cues on a device
pub trait CueSink: Send + Sync {
    fn name(&self) -> &'static str;

    fn play_tone(&self, cue: Cue, tone: &ToneSpec) -> Result<(), CueError>;

    fn vibrate(&self, cue: Cue, pattern: &[u32]) -> Result<(), CueError>;
}

/// User toggles for cue output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueSettings {
    pub sound: bool,
    pub vibration: bool,
    /// Gain in 0.0..=1.0
    pub volume: f32,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: false,
            volume: 0.8,
        }
    }
}

/// Dispatches cues to every sink according to the current toggles
pub struct CuePlayer {
    settings: Mutex<CueSettings>,
    sinks: Vec<Box<dyn CueSink>>,
}

impl CuePlayer {
    pub fn new(settings: CueSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: impl CueSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn settings(&self) -> CueSettings {
        self.settings.lock().map(|s| *s).unwrap_or_default()
    }

    pub fn update_settings(&self, mut settings: CueSettings) -> Result<CueSettings, String> {
        settings.volume = settings.volume.clamp(0.0, 1.0);
        let mut current = self.settings.lock()
            .map_err(|e| format!("Failed to lock cue settings: {}", e))?;
        *current = settings;
        Ok(settings)
    }

    /// Fire-and-forget playback of one cue
    pub fn play(&self, cue: Cue) {
        let settings = self.settings();
        if !settings.sound && !settings.vibration {
            return;
        }

        let tone = settings.sound.then(|| cue.tone(settings.volume));
        for sink in &self.sinks {
            if let Some(tone) = &tone {
                if let Err(e) = sink.play_tone(cue, tone) {
                    debug!("{} could not play {:?}: {}", sink.name(), cue, e);
                }
            }
            if settings.vibration {
                if let Err(e) = sink.vibrate(cue, cue.vibration()) {
                    debug!("{} could not vibrate for {:?}: {}", sink.name(), cue, e);
                }
            }
        }
    }
}

impl std::fmt::Debug for CuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("CuePlayer")
            .field("settings", &self.settings())
            .field("sinks", &names)
            .finish()
    }
}

/// Forwards cues to connected event-stream clients, which do the synthesis
pub struct EventStreamSink {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventStreamSink {
    pub fn new(tx: broadcast::Sender<ServerEvent>) -> Self {
        Self { tx }
    }
}

impl CueSink for EventStreamSink {
    fn name(&self) -> &'static str {
        "event-stream"
    }

    fn play_tone(&self, cue: Cue, tone: &ToneSpec) -> Result<(), CueError> {
        self.tx
            .send(ServerEvent::Tone { cue, tone: tone.clone() })
            .map(|_| ())
            .map_err(|_| CueError::NoListeners)
    }

    fn vibrate(&self, cue: Cue, pattern: &[u32]) -> Result<(), CueError> {
        self.tx
            .send(ServerEvent::Vibrate { cue, pattern: pattern.to_vec() })
            .map(|_| ())
            .map_err(|_| CueError::NoListeners)
    }
}

/// Rings the terminal bell once per note; terminals cannot vibrate
pub struct TerminalBell;

impl CueSink for TerminalBell {
    fn name(&self) -> &'static str {
        "terminal-bell"
    }

    fn play_tone(&self, _cue: Cue, tone: &ToneSpec) -> Result<(), CueError> {
        if tone.gain <= 0.0 {
            return Ok(());
        }
        let mut stderr = std::io::stderr().lock();
        for _ in &tone.notes {
            stderr.write_all(b"\x07")?;
        }
        stderr.flush()?;
        Ok(())
    }

    fn vibrate(&self, _cue: Cue, _pattern: &[u32]) -> Result<(), CueError> {
        Err(CueError::Unsupported("vibration"))
    }
}

/// Sink that only logs, used when no other output is configured
pub struct LogSink;

impl CueSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn play_tone(&self, cue: Cue, tone: &ToneSpec) -> Result<(), CueError> {
        debug!("Cue {:?}: {} note(s) at gain {:.2}", cue, tone.notes.len(), tone.gain);
        Ok(())
    }

    fn vibrate(&self, cue: Cue, pattern: &[u32]) -> Result<(), CueError> {
        if pattern.is_empty() {
            warn!("Empty vibration pattern for {:?}", cue);
        }
        debug!("Cue {:?}: vibrate {:?}", cue, pattern);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// What a recording sink observed
    #[derive(Debug, Clone, PartialEq)]
    pub enum Played {
        Tone(Cue),
        Vibration(Cue, Vec<u32>),
    }

    /// Sink that records every call, optionally failing vibration
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub played: Arc<Mutex<Vec<Played>>>,
        pub vibration_unsupported: bool,
    }

    impl RecordingSink {
        pub fn played(&self) -> Vec<Played> {
            self.played.lock().unwrap().clone()
        }

        pub fn tones(&self) -> Vec<Cue> {
            self.played()
                .into_iter()
                .filter_map(|p| match p {
                    Played::Tone(cue) => Some(cue),
                    Played::Vibration(..) => None,
                })
                .collect()
        }
    }

    impl CueSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn play_tone(&self, cue: Cue, _tone: &ToneSpec) -> Result<(), CueError> {
            self.played.lock().unwrap().push(Played::Tone(cue));
            Ok(())
        }

        fn vibrate(&self, cue: Cue, pattern: &[u32]) -> Result<(), CueError> {
            if self.vibration_unsupported {
                return Err(CueError::Unsupported("vibration"));
            }
            self.played.lock().unwrap().push(Played::Vibration(cue, pattern.to_vec()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Played, RecordingSink};
    use super::*;

    fn player(settings: CueSettings, sink: &RecordingSink) -> CuePlayer {
        CuePlayer::new(settings).with_sink(sink.clone())
    }

    #[test]
    fn silent_when_both_toggles_off() {
        let sink = RecordingSink::default();
        let settings = CueSettings { sound: false, vibration: false, volume: 0.8 };
        player(settings, &sink).play(Cue::Long);
        assert!(sink.played().is_empty());
    }

    #[test]
    fn toggles_are_independent() {
        let sink = RecordingSink::default();
        let settings = CueSettings { sound: false, vibration: true, volume: 0.8 };
        player(settings, &sink).play(Cue::End);
        assert_eq!(sink.played(), vec![Played::Vibration(Cue::End, vec![120, 80, 150])]);

        let sink = RecordingSink::default();
        player(CueSettings::default(), &sink).play(Cue::Short);
        assert_eq!(sink.played(), vec![Played::Tone(Cue::Short)]);
    }

    #[test]
    fn unsupported_vibration_is_swallowed() {
        let sink = RecordingSink { vibration_unsupported: true, ..Default::default() };
        let settings = CueSettings { sound: true, vibration: true, volume: 0.5 };
        player(settings, &sink).play(Cue::Long);
        assert_eq!(sink.tones(), vec![Cue::Long]);
    }

    #[test]
    fn event_stream_without_listeners_does_not_fail_playback() {
        let (tx, _) = broadcast::channel(4);
        let player = CuePlayer::new(CueSettings::default()).with_sink(EventStreamSink::new(tx));
        player.play(Cue::Short);
    }

    #[test]
    fn volume_is_clamped_on_update() {
        let player = CuePlayer::new(CueSettings::default());
        let updated = player
            .update_settings(CueSettings { sound: true, vibration: true, volume: 4.0 })
            .unwrap();
        assert_eq!(updated.volume, 1.0);
        assert_eq!(player.settings(), updated);
    }
}
