//! Note orchestration: validation, owner scoping, and cache-aside reads.

mod notes;

pub use notes::NoteService;
