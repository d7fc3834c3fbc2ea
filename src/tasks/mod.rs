//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod countdown_timer;

pub use countdown_timer::countdown_timer_task;
