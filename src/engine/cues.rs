//! Audio and vibration cues
//!
//! Cues are described, not played: a sink receives the tone shape and the
//! vibration pattern and renders them however its device allows.

use serde::{Deserialize, Serialize};

use super::countdown::Mode;

/// The three cue types the timer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Countdown tap at 3, 2 and 1
    Short,
    /// Sustained tone when a phase reaches zero
    Long,
    /// Arpeggio when the whole workout is done
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Square,
    Sine,
    Triangle,
    Sawtooth,
}

/// ADSR envelope, all values in seconds except `sustain` (a level)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Note {
    /// Scientific pitch name, e.g. "A5"
    pub pitch: &'static str,
    pub frequency_hz: f32,
    pub duration_secs: f32,
    /// Offset from the cue start
    pub start_secs: f32,
}

/// Everything a synthesiser needs to render one cue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub envelope: Envelope,
    pub notes: Vec<Note>,
    pub gain: f32,
    /// The sound resource can be released after this many milliseconds
    pub dispose_after_ms: u32,
}

const A5: f32 = 880.0;
const C6: f32 = 1046.5;
const E6: f32 = 1318.51;

impl Cue {
    pub fn tone(&self, gain: f32) -> ToneSpec {
        let gain = gain.clamp(0.0, 1.0);
        match self {
            Cue::Short => ToneSpec {
                waveform: Waveform::Square,
                envelope: Envelope {
                    attack: 0.001,
                    decay: 0.06,
                    sustain: 0.0,
                    release: 0.04,
                },
                notes: vec![note("A5", A5, 0.12, 0.0)],
                gain,
                dispose_after_ms: 250,
            },
            Cue::Long => ToneSpec {
                waveform: Waveform::Square,
                envelope: Envelope {
                    attack: 0.001,
                    decay: 0.2,
                    sustain: 0.7,
                    release: 1.8,
                },
                notes: vec![note("A5", A5, 2.0, 0.0)],
                gain,
                dispose_after_ms: 2200,
            },
            Cue::End => ToneSpec {
                waveform: Waveform::Square,
                envelope: Envelope {
                    attack: 0.001,
                    decay: 0.12,
                    sustain: 0.2,
                    release: 0.25,
                },
                notes: vec![
                    note("A5", A5, 0.12, 0.0),
                    note("C6", C6, 0.12, 0.18),
                    note("E6", E6, 0.2, 0.36),
                ],
                gain,
                dispose_after_ms: 1000,
            },
        }
    }

    /// Vibration pattern in milliseconds (on, off, on, ...)
    pub fn vibration(&self) -> &'static [u32] {
        match self {
            Cue::Short => &[80],
            Cue::Long => &[2000],
            Cue::End => &[120, 80, 150],
        }
    }
}

fn note(pitch: &'static str, frequency_hz: f32, duration_secs: f32, start_secs: f32) -> Note {
    Note {
        pitch,
        frequency_hz,
        duration_secs,
        start_secs,
    }
}

/// Countdown beep for a new `remaining` value, if one is due
pub fn countdown_cue(remaining: u32, mode: Mode) -> Option<Cue> {
    (mode == Mode::Running && (1..=3).contains(&remaining)).then_some(Cue::Short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_beeps_only_at_three_two_one_while_running() {
        assert_eq!(countdown_cue(3, Mode::Running), Some(Cue::Short));
        assert_eq!(countdown_cue(1, Mode::Running), Some(Cue::Short));
        assert_eq!(countdown_cue(0, Mode::Running), None);
        assert_eq!(countdown_cue(4, Mode::Running), None);
        assert_eq!(countdown_cue(2, Mode::Paused), None);
    }

    #[test]
    fn end_cue_is_a_three_note_arpeggio() {
        let tone = Cue::End.tone(0.8);
        let pitches: Vec<_> = tone.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec!["A5", "C6", "E6"]);
        assert!(tone.notes.windows(2).all(|w| w[0].start_secs < w[1].start_secs));
    }

    #[test]
    fn vibration_roughly_tracks_tone_length() {
        let long: u32 = Cue::Long.vibration().iter().sum();
        let short: u32 = Cue::Short.vibration().iter().sum();
        assert_eq!(long, 2000);
        assert!(short < 200);
    }

    #[test]
    fn gain_is_clamped() {
        assert_eq!(Cue::Short.tone(3.0).gain, 1.0);
        assert_eq!(Cue::Short.tone(-1.0).gain, 0.0);
    }
}
