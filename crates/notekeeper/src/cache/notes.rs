//! Typed, per-user view over the byte cache.

use std::sync::Arc;
use std::time::Duration;

use notekeeper_core::cache::{
    deserialize_notes, notes_key, serialize_notes, Cache, CacheError, NOTES_CACHE_TTL,
};
use notekeeper_core::notes::{Note, UserId};

/// Cache of each user's full note list.
///
/// Not authoritative: every method may fail, and callers are expected to
/// fall back to the store rather than fail the request.
#[derive(Clone)]
pub struct NotesCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl NotesCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_ttl(cache, NOTES_CACHE_TTL)
    }

    pub fn with_ttl(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Returns the cached list for a user.
    ///
    /// `Ok(None)` is a miss: the key is absent, expired, or holds a value that
    /// does not decode. `Err` means the backend itself could not be reached.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Vec<Note>>, CacheError> {
        let Some(bytes) = self.cache.get(&notes_key(user_id)).await? else {
            return Ok(None);
        };

        match deserialize_notes(&bytes) {
            Ok(notes) => Ok(Some(notes)),
            Err(err) => {
                tracing::warn!(user_id, error = %err, "Cached notes deserialization failed");
                Ok(None)
            }
        }
    }

    /// Stores the full list for a user, replacing any previous entry.
    pub async fn set(&self, user_id: UserId, notes: &[Note]) -> Result<(), CacheError> {
        let bytes = serialize_notes(notes).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.cache
            .set(&notes_key(user_id), &bytes, Some(self.ttl))
            .await
    }

    /// Drops the cached list for a user. A missing entry is not an error.
    pub async fn invalidate(&self, user_id: UserId) -> Result<(), CacheError> {
        self.cache.delete(&notes_key(user_id)).await
    }
}
