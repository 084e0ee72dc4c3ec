//! Pure functions for serializing note lists to and from cache bytes.
//!
//! JSON keeps cached values readable from `redis-cli`.

use crate::notes::Note;
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a user's notes to JSON bytes.
pub fn serialize_notes(notes: &[Note]) -> Result<Vec<u8>> {
    serde_json::to_vec(notes).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a list of notes.
pub fn deserialize_notes(bytes: &[u8]) -> Result<Vec<Note>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_roundtrip() {
        let notes = vec![Note::new(1, 7, "A", "B"), Note::new(2, 7, "C", "")];

        let bytes = serialize_notes(&notes).unwrap();
        let restored = deserialize_notes(&bytes).unwrap();

        assert_eq!(restored, notes);
    }

    #[test]
    fn test_empty_list_is_a_valid_value() {
        let bytes = serialize_notes(&[]).unwrap();
        assert_eq!(bytes, b"[]");
        assert!(deserialize_notes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_garbage_fails() {
        let result = deserialize_notes(b"not json");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_deserialize_wrong_shape_fails() {
        let result = deserialize_notes(br#"{"id":1}"#);
        assert!(result.is_err());
    }
}
