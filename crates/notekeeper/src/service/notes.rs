use std::sync::Arc;

use notekeeper_core::events::{welcome_note, RegistrationEvent};
use notekeeper_core::notes::{
    validate_new_note, validate_note_id, validate_update, validate_user_id, NewNote, Note,
    NoteError, NoteId, NoteUpdate, UserId,
};
use notekeeper_core::storage::NoteRepository;

use crate::cache::NotesCache;

/// Note operations bound to an owner.
///
/// The repository is authoritative. The cache is optional and only ever
/// accelerates `list_notes`; every failure on it is logged and swallowed.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
    cache: Option<NotesCache>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>, cache: Option<NotesCache>) -> Self {
        Self { repo, cache }
    }

    /// Reads a single note straight from the store.
    pub async fn get_note(&self, user_id: UserId, id: NoteId) -> Result<Note, NoteError> {
        validate_user_id(user_id)?;
        validate_note_id(id)?;

        self.repo
            .get(user_id, id)
            .await
            .map_err(|e| NoteError::from_repository("get note", e))
    }

    /// Lists every note of a user, serving from the cache when possible.
    pub async fn list_notes(&self, user_id: UserId) -> Result<Vec<Note>, NoteError> {
        validate_user_id(user_id)?;

        if let Some(cache) = &self.cache {
            match cache.get(user_id).await {
                Ok(Some(notes)) => {
                    tracing::debug!(user_id, count = notes.len(), "Notes cache hit");
                    return Ok(notes);
                }
                Ok(None) => tracing::debug!(user_id, "Notes cache miss"),
                Err(err) => tracing::warn!(user_id, error = %err, "Notes cache read failed"),
            }
        }

        let notes = self
            .repo
            .list_by_owner(user_id)
            .await
            .map_err(|e| NoteError::from_repository("list notes", e))?;

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.set(user_id, &notes).await {
                tracing::warn!(user_id, error = %err, "Notes cache write failed");
            }
        }

        Ok(notes)
    }

    /// Validates and inserts a note, returning its new id.
    pub async fn create_note(&self, user_id: UserId, note: NewNote) -> Result<NoteId, NoteError> {
        validate_user_id(user_id)?;
        validate_new_note(&note)?;

        let id = self
            .repo
            .insert(user_id, &note)
            .await
            .map_err(|e| NoteError::from_repository("create note", e))?;

        self.invalidate(user_id).await;
        tracing::info!(user_id, note_id = id, "Note created");
        Ok(id)
    }

    /// Applies a partial update and returns the merged note.
    pub async fn update_note(
        &self,
        user_id: UserId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Note, NoteError> {
        validate_user_id(user_id)?;
        validate_note_id(id)?;
        validate_update(&update)?;

        let note = self
            .repo
            .update(user_id, id, &update)
            .await
            .map_err(|e| NoteError::from_repository("update note", e))?;

        self.invalidate(user_id).await;
        tracing::info!(user_id, note_id = id, "Note updated");
        Ok(note)
    }

    pub async fn delete_note(&self, user_id: UserId, id: NoteId) -> Result<(), NoteError> {
        validate_user_id(user_id)?;
        validate_note_id(id)?;

        self.repo
            .delete(user_id, id)
            .await
            .map_err(|e| NoteError::from_repository("delete note", e))?;

        self.invalidate(user_id).await;
        tracing::info!(user_id, note_id = id, "Note deleted");
        Ok(())
    }

    /// Creates the welcome note for a freshly registered user.
    pub async fn create_welcome_note(&self, event: &RegistrationEvent) -> Result<NoteId, NoteError> {
        self.create_note(event.user_id, welcome_note(event)).await
    }

    /// Runs after the store write has committed.
    async fn invalidate(&self, user_id: UserId) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.invalidate(user_id).await {
                tracing::warn!(user_id, error = %err, "Notes cache invalidation failed");
            }
        }
    }
}
