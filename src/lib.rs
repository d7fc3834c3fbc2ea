//! HIIT Pro - An interval workout timer served over HTTP
//!
//! A fixed-round HIIT timer and a custom interval sequencer share one
//! countdown engine. Phase changes and the last three seconds emit audio
//! and vibration cues; custom workouts and preferences persist locally.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;
pub mod workouts;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
