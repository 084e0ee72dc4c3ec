//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use notekeeper_core::notes::{NewNote, Note, NoteId, NoteUpdate, UserId};
use notekeeper_core::storage::{NoteRepository, RepositoryError, Result};

/// In-memory note store.
///
/// Ids are assigned from a process-wide sequence starting at 1.
#[derive(Debug, Clone)]
pub struct InMemoryNoteRepository {
    notes: Arc<RwLock<HashMap<NoteId, Note>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            notes: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn list_by_owner(&self, user_id: UserId) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut owned: Vec<Note> = notes
            .values()
            .filter(|note| note.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|note| note.id);
        Ok(owned)
    }

    async fn get(&self, user_id: UserId, id: NoteId) -> Result<Note> {
        let notes = self.notes.read().await;
        notes
            .get(&id)
            .filter(|note| note.user_id == user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::note_not_found(id))
    }

    async fn insert(&self, user_id: UserId, note: &NewNote) -> Result<NoteId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut notes = self.notes.write().await;
        notes.insert(
            id,
            Note::new(id, user_id, note.title.clone(), note.content.clone()),
        );
        Ok(id)
    }

    async fn update(&self, user_id: UserId, id: NoteId, update: &NoteUpdate) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let existing = notes
            .get_mut(&id)
            .filter(|note| note.user_id == user_id)
            .ok_or_else(|| RepositoryError::note_not_found(id))?;

        *existing = update.apply_to(existing);
        Ok(existing.clone())
    }

    async fn delete(&self, user_id: UserId, id: NoteId) -> Result<()> {
        let mut notes = self.notes.write().await;
        match notes.get(&id) {
            Some(note) if note.user_id == user_id => {
                notes.remove(&id);
                Ok(())
            }
            _ => Err(RepositoryError::note_not_found(id)),
        }
    }
}
