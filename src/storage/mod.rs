//! Local persistent storage
//!
//! A single-device key-value store standing in for browser local storage.

pub mod error;
pub mod local;

pub use error::StorageError;
pub use local::LocalStore;
