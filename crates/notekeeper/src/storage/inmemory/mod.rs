//! In-memory storage backend.
//!
//! Stores notes in a `HashMap` behind an `Arc<RwLock<_>>`. Useful for
//! development and tests where persistence is not required.

mod repository;

pub use repository::InMemoryNoteRepository;
