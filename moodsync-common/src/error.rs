//! Common error types for MoodSync

use thiserror::Error;

/// Common result type for MoodSync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MoodSync crates
///
/// The fusion engine itself never returns these; they surface only at
/// configuration and parsing boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
