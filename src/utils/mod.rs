//! Utility functions module

pub mod format;
pub mod signals;

pub use format::{format_big_time, format_time};
pub use signals::shutdown_signal;
