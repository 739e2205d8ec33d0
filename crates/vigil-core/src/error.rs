//! Error types for the guard core.

use thiserror::Error;

/// Result type alias for guard operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors crossing the guard core's contract boundaries.
///
/// Listen timeouts and unintelligible speech are NOT errors; the speech
/// channel reports those as an empty transcript. `Listen` covers transport
/// failures only, and callers degrade it to an empty transcript.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech output error: {0}")]
    Speech(String),

    #[error("Speech transport error: {0}")]
    Listen(String),

    #[error("Evidence persistence error: {0}")]
    Evidence(String),

    #[error("Vision error: {0}")]
    Vision(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
