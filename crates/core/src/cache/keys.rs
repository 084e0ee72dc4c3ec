use std::time::Duration;

use crate::notes::UserId;

/// Time-to-live of a cached note list.
pub const NOTES_CACHE_TTL: Duration = Duration::from_secs(90);

/// Returns the cache key for a user's note list.
pub fn notes_key(user_id: UserId) -> String {
    format!("notes:{}", user_id)
}
