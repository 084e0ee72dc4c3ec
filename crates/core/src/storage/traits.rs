use async_trait::async_trait;

use crate::notes::{NewNote, Note, NoteId, NoteUpdate, UserId};

use super::Result;

/// Durable storage of notes.
///
/// Every operation is scoped by `user_id` inside the query itself. A note that
/// exists but belongs to another user is reported exactly like a missing one.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Lists all notes owned by a user, in no particular order.
    async fn list_by_owner(&self, user_id: UserId) -> Result<Vec<Note>>;

    /// Gets one note. Fails with `RepositoryError::NotFound` when absent.
    async fn get(&self, user_id: UserId, id: NoteId) -> Result<Note>;

    /// Inserts a note and returns the id assigned by the store.
    async fn insert(&self, user_id: UserId, note: &NewNote) -> Result<NoteId>;

    /// Applies a partial update with read-modify-write semantics and returns
    /// the merged note.
    async fn update(&self, user_id: UserId, id: NoteId, update: &NoteUpdate) -> Result<Note>;

    /// Deletes one note. Fails with `RepositoryError::NotFound` when absent.
    async fn delete(&self, user_id: UserId, id: NoteId) -> Result<()>;
}
