//! Application error type

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by timer, editor and store operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error("workout configuration is not runnable")]
    InvalidConfig,

    #[error("operation is only allowed while editing")]
    NotEditing,

    #[error("no interval with id {0}")]
    UnknownInterval(u32),

    #[error("no saved workout with id {0}")]
    UnknownWorkout(String),

    #[error("workout name must not be empty")]
    EmptyName,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Lock(String),

    #[error("{0}")]
    Task(String),
}

pub type AppResult<T> = Result<T, AppError>;
