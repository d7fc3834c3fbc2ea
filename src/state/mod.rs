//! State management module
//!
//! Shared application state, the published run snapshot and user settings.

pub mod app_state;
pub mod run_state;
pub mod settings;

pub use app_state::AppState;
pub use run_state::{RunSnapshot, ServerEvent};
pub use settings::{Screen, Settings, Theme, WakeLockMode};
