use thiserror::Error;

use crate::notes::ErrorKind;

/// Errors raised while moving registration events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Failed to decode event: {0}")]
    Decode(String),
    #[error("Failed to encode event: {0}")]
    Encode(String),
    #[error("Event transport error: {0}")]
    Transport(String),
    #[error("Event transport closed")]
    Closed,
}

impl EventError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventError::Decode(_) => ErrorKind::Validation,
            EventError::Encode(_) => ErrorKind::Internal,
            EventError::Transport(_) | EventError::Closed => ErrorKind::Unavailable,
        }
    }
}

/// Result type for event operations.
pub type Result<T> = std::result::Result<T, EventError>;
