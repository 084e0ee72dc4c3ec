//! SQLite row conversion functions.

use notekeeper_core::notes::Note;
use rusqlite::Row;

/// Convert a SQLite row to a Note.
///
/// Expected columns: id, user_id, title, content
pub fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
    })
}
