//! SQLite schema definitions and SQL query constants.
//!
//! Every statement that touches an existing note is scoped by `user_id`, so a
//! note owned by someone else is indistinguishable from a missing one.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id);
"#;

pub const SELECT_NOTES_BY_OWNER: &str = r#"
SELECT id, user_id, title, content
FROM notes
WHERE user_id = ?1
ORDER BY id
"#;

pub const SELECT_NOTE: &str = r#"
SELECT id, user_id, title, content
FROM notes
WHERE id = ?1 AND user_id = ?2
"#;

pub const INSERT_NOTE: &str = r#"
INSERT INTO notes (user_id, title, content)
VALUES (?1, ?2, ?3)
"#;

pub const UPDATE_NOTE: &str = r#"
UPDATE notes
SET title = ?3, content = ?4
WHERE id = ?1 AND user_id = ?2
"#;

pub const DELETE_NOTE: &str = r#"
DELETE FROM notes
WHERE id = ?1 AND user_id = ?2
"#;
