mod error;
mod http_mapping;
mod requests;
mod types;
mod validation;

pub use error::{ErrorKind, NoteError};
pub use http_mapping::{
    error_kind_to_status_code, note_error_to_status_code, public_message, INTERNAL_ERROR_MESSAGE,
    UNAVAILABLE_ERROR_MESSAGE,
};
pub use requests::{CreateNoteRequest, CreatedNote, UpdateNoteRequest};
pub use types::{NewNote, Note, NoteId, NoteUpdate, UserId};
pub use validation::{
    validate_new_note, validate_note_id, validate_update, validate_user_id, MAX_CONTENT_LEN,
    MAX_TITLE_LEN, MAX_UPDATED_TITLE_LEN,
};
