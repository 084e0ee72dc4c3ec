//! SQLite repository implementation.
//!
//! Implements `NoteRepository` from `notekeeper_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use notekeeper_core::notes::{NewNote, Note, NoteId, NoteUpdate, UserId};
use notekeeper_core::storage::{NoteRepository, RepositoryError, Result};

use super::conversions::row_to_note;
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based note repository.
pub struct SqliteNoteRepository {
    conn: Connection,
}

impl SqliteNoteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn list_by_owner(&self, user_id: UserId) -> Result<Vec<Note>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTES_BY_OWNER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([user_id], row_to_note).map_err(wrap_err)?;

                let mut notes = Vec::new();
                for row_result in rows {
                    notes.push(row_result.map_err(wrap_err)?);
                }
                Ok(notes)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn get(&self, user_id: UserId, id: NoteId) -> Result<Note> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_NOTE).map_err(wrap_err)?;
                stmt.query_row([id, user_id], row_to_note).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn insert(&self, user_id: UserId, note: &NewNote) -> Result<NoteId> {
        let title = note.title.clone();
        let content = note.content.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_NOTE,
                    rusqlite::params![user_id, title, content],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn update(&self, user_id: UserId, id: NoteId, update: &NoteUpdate) -> Result<Note> {
        let update = update.clone();

        // Read-modify-write inside one transaction so a concurrent writer
        // cannot interleave between the read and the merge.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let existing = tx
                    .query_row(schema::SELECT_NOTE, [id, user_id], row_to_note)
                    .map_err(wrap_err)?;
                let merged = update.apply_to(&existing);
                tx.execute(
                    schema::UPDATE_NOTE,
                    rusqlite::params![id, user_id, merged.title, merged.content],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(merged)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn delete(&self, user_id: UserId, id: NoteId) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_NOTE, [id, user_id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }
}
