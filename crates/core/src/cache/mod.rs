mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{notes_key, NOTES_CACHE_TTL};
pub use serialization::{deserialize_notes, serialize_notes, SerializationError};
pub use traits::Cache;
