//! Error types for the ev-app layer.

use std::path::PathBuf;

use ev_query::QueryError;
use ev_store::StoreError;

/// Application error wrapping the store and query layers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for ev-app operations.
pub type AppResult<T> = Result<T, AppError>;
