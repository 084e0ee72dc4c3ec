use thiserror::Error;

use crate::storage::RepositoryError;

/// Coarse classification shared by every error the service can surface.
///
/// The gateway maps a kind, never a concrete variant, to a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input shape or size. Never retried.
    Validation,
    /// Missing or invalid credential.
    Authorization,
    /// No such note for this owner.
    NotFound,
    /// A degradable dependency (cache, event transport) is unreachable.
    Unavailable,
    /// Unexpected store failure. Opaque to callers.
    Internal,
}

/// Errors returned by note operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error("invalid note ID")]
    InvalidId,
    #[error("invalid user ID")]
    InvalidUserId,
    #[error("note not found")]
    NotFound,
    #[error("title is required")]
    TitleRequired,
    #[error("title too long")]
    TitleTooLong,
    #[error("content too long")]
    ContentTooLong,
    #[error("nothing to update")]
    NothingToUpdate,
    #[error("{operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl NoteError {
    /// Wraps a store failure with the operation that hit it.
    ///
    /// `RepositoryError::NotFound` becomes [`NoteError::NotFound`] so store
    /// details never leak past the service boundary.
    pub fn from_repository(operation: &'static str, source: RepositoryError) -> Self {
        match source {
            RepositoryError::NotFound { .. } => NoteError::NotFound,
            source => NoteError::Storage { operation, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NoteError::InvalidId
            | NoteError::InvalidUserId
            | NoteError::TitleRequired
            | NoteError::TitleTooLong
            | NoteError::ContentTooLong
            | NoteError::NothingToUpdate => ErrorKind::Validation,
            NoteError::NotFound => ErrorKind::NotFound,
            NoteError::Storage { .. } => ErrorKind::Internal,
        }
    }
}
