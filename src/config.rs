//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::services::CueSettings;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "hiit-pro")]
#[command(about = "HIIT and custom interval workout timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding saved workouts and preferences
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Start with sound cues off
    #[arg(long)]
    pub mute: bool,

    /// Start with vibration cues on
    #[arg(long)]
    pub vibration: bool,

    /// Cue volume between 0.0 and 1.0
    #[arg(long, default_value = "0.8")]
    pub volume: f32,

    /// Ring the terminal bell on cues
    #[arg(long)]
    pub bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial cue toggles
    pub fn cue_settings(&self) -> CueSettings {
        CueSettings {
            sound: !self.mute,
            vibration: self.vibration,
            volume: self.volume.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["hiit-pro"]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.cue_settings(), CueSettings::default());
    }

    #[test]
    fn cue_flags() {
        let config = Config::parse_from(["hiit-pro", "--mute", "--vibration", "--volume", "2.5", "-v"]);
        let cues = config.cue_settings();
        assert!(!cues.sound);
        assert!(cues.vibration);
        assert_eq!(cues.volume, 1.0);
        assert_eq!(config.log_level(), "debug");
    }
}
