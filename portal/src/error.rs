//! Error types for SeaCollege Voice
//!
//! All errors use thiserror for structured error handling.
//! Views turn them into inline strings; nothing here is shown raw to a user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A stored collection exists but cannot be decoded.
    #[error("Stored collection '{key}' is corrupt: {source}")]
    CorruptCollection {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Photo is too large ({size} bytes)")]
    PhotoTooLarge { size: u64 },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
