use serde::{Deserialize, Serialize};

/// Identifier of a user, as carried in the `sub` claim of a bearer token.
pub type UserId = i64;

/// Store-assigned identifier of a note.
pub type NoteId = i64;

/// A note owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(
        id: NoteId,
        user_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Fields of a note that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Partial update of a note. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Merges this update into an existing note, returning the result.
    ///
    /// Identity fields (`id`, `user_id`) are never touched.
    pub fn apply_to(&self, note: &Note) -> Note {
        Note {
            id: note.id,
            user_id: note.user_id,
            title: self.title.clone().unwrap_or_else(|| note.title.clone()),
            content: self.content.clone().unwrap_or_else(|| note.content.clone()),
        }
    }
}
