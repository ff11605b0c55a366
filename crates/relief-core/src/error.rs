//! Error types for Relief

use thiserror::Error;

/// The main error type for Relief operations
#[derive(Debug, Error)]
pub enum ReliefError {
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Identifier allocation exhausted after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Relief operations
pub type Result<T> = std::result::Result<T, ReliefError>;

impl From<serde_json::Error> for ReliefError {
    fn from(err: serde_json::Error) -> Self {
        ReliefError::MalformedMessage(err.to_string())
    }
}

impl From<uuid::Error> for ReliefError {
    fn from(err: uuid::Error) -> Self {
        ReliefError::MalformedMessage(err.to_string())
    }
}
