//! Error types for repairhub

use thiserror::Error;

/// Main error type for repairhub operations
#[derive(Error, Debug)]
pub enum Error {
    /// Backend rejected the operation; message is passed through verbatim
    #[error("{0}")]
    Api(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Incomplete repair request: {0}")]
    DraftIncomplete(String),

    #[error("Unknown service center: {0}")]
    UnknownCenter(i64),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for repairhub operations
pub type Result<T> = std::result::Result<T, Error>;
