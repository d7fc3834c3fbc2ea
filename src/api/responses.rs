//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::CueSettings,
    state::{RunSnapshot, Settings},
    workouts::{Interval, SavedWorkout},
};

/// Response for timer control endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub run: RunSnapshot,
}

impl ApiResponse {
    pub fn new(status: &str, message: impl Into<String>, run: RunSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            run,
        }
    }

    /// The requested transition happened
    pub fn applied(message: impl Into<String>, run: RunSnapshot) -> Self {
        Self::new("ok", message, run)
    }

    /// The request was legal but had nothing to do
    pub fn unchanged(message: impl Into<String>, run: RunSnapshot) -> Self {
        Self::new("unchanged", message, run)
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Full status including preferences
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub run: RunSnapshot,
    pub cues: CueSettings,
    pub settings: Settings,
    /// Whether a timer screen should hold a wake lock right now
    pub keep_screen_awake: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Custom workout editor contents
#[derive(Debug, Clone, Serialize)]
pub struct IntervalsResponse {
    pub intervals: Vec<Interval>,
    pub total_seconds: u64,
    /// Total formatted as MM:SS
    pub total_time: String,
    pub runnable: bool,
}

/// Result of loading a saved workout into the editor
#[derive(Debug, Clone, Serialize)]
pub struct LoadedWorkoutResponse {
    pub intervals: Vec<Interval>,
    pub run: RunSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutsResponse {
    pub workouts: Vec<SavedWorkout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
