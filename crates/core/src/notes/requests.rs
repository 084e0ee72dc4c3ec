//! API request and response payloads for note operations.

use serde::{Deserialize, Serialize};

use super::{NewNote, NoteId, NoteUpdate};

/// Request payload for creating a note.
///
/// Missing fields deserialize as empty strings so that an absent title is
/// reported as "title is required" rather than a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CreateNoteRequest {
    pub fn into_new_note(self) -> NewNote {
        NewNote::new(self.title, self.content)
    }
}

/// Request payload for a partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdateNoteRequest {
    pub fn into_update(self) -> NoteUpdate {
        NoteUpdate {
            title: self.title,
            content: self.content,
        }
    }
}

/// Response body for a created note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNote {
    pub id: NoteId,
}
