//! Error types for local storage writes

use std::path::PathBuf;
use thiserror::Error;

/// Errors while persisting the local key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode value for key {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
