//! Pure functions for mapping note errors to HTTP responses.

use super::{ErrorKind, NoteError};

/// Message returned to clients for errors whose detail must stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Message returned to clients when the service is degraded.
pub const UNAVAILABLE_ERROR_MESSAGE: &str = "service unavailable";

/// Maps an [`ErrorKind`] to an HTTP status code.
///
/// - `Validation` -> 400 (Bad Request)
/// - `Authorization` -> 401 (Unauthorized)
/// - `NotFound` -> 404 (Not Found)
/// - `Unavailable` -> 503 (Service Unavailable)
/// - `Internal` -> 500 (Internal Server Error)
pub fn error_kind_to_status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Validation => 400,
        ErrorKind::Authorization => 401,
        ErrorKind::NotFound => 404,
        ErrorKind::Unavailable => 503,
        ErrorKind::Internal => 500,
    }
}

/// Maps a [`NoteError`] to an HTTP status code.
///
/// # Examples
///
/// ```
/// use notekeeper_core::notes::{note_error_to_status_code, NoteError};
///
/// assert_eq!(note_error_to_status_code(&NoteError::NotFound), 404);
/// assert_eq!(note_error_to_status_code(&NoteError::TitleTooLong), 400);
/// ```
pub fn note_error_to_status_code(error: &NoteError) -> u16 {
    error_kind_to_status_code(error.kind())
}

/// Returns the stable, client-facing message for an error.
///
/// Validation and not-found errors expose their own message; anything else
/// collapses into a generic string.
pub fn public_message(error: &NoteError) -> String {
    match error.kind() {
        ErrorKind::Internal => INTERNAL_ERROR_MESSAGE.to_string(),
        ErrorKind::Unavailable => UNAVAILABLE_ERROR_MESSAGE.to_string(),
        _ => error.to_string(),
    }
}
