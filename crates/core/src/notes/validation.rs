//! Validation rules for note operations.
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use super::{NewNote, NoteError, NoteId, NoteUpdate, UserId};

/// Maximum title length accepted on create.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum title length accepted on update. Tighter than create on purpose.
pub const MAX_UPDATED_TITLE_LEN: usize = 250;

/// Maximum content length, shared by create and update.
pub const MAX_CONTENT_LEN: usize = 5000;

pub fn validate_user_id(user_id: UserId) -> Result<(), NoteError> {
    if user_id <= 0 {
        return Err(NoteError::InvalidUserId);
    }
    Ok(())
}

pub fn validate_note_id(id: NoteId) -> Result<(), NoteError> {
    if id <= 0 {
        return Err(NoteError::InvalidId);
    }
    Ok(())
}

/// Validates a note before insertion.
///
/// The title must contain something other than whitespace, but its length is
/// measured on the raw value that will be stored.
pub fn validate_new_note(note: &NewNote) -> Result<(), NoteError> {
    if note.title.trim().is_empty() {
        return Err(NoteError::TitleRequired);
    }
    if note.title.chars().count() > MAX_TITLE_LEN {
        return Err(NoteError::TitleTooLong);
    }
    validate_content(&note.content)
}

/// Validates a partial update.
///
/// At least one field must be present. As on create, a present title must
/// contain something other than whitespace and its length is measured on the
/// raw value that will be stored.
pub fn validate_update(update: &NoteUpdate) -> Result<(), NoteError> {
    if update.is_empty() {
        return Err(NoteError::NothingToUpdate);
    }
    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(NoteError::TitleRequired);
        }
        if title.chars().count() > MAX_UPDATED_TITLE_LEN {
            return Err(NoteError::TitleTooLong);
        }
    }
    if let Some(content) = &update.content {
        validate_content(content)?;
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), NoteError> {
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(NoteError::ContentTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn test_ids_must_be_positive() {
        assert_eq!(validate_user_id(0), Err(NoteError::InvalidUserId));
        assert_eq!(validate_user_id(-5), Err(NoteError::InvalidUserId));
        assert_eq!(validate_user_id(1), Ok(()));

        assert_eq!(validate_note_id(0), Err(NoteError::InvalidId));
        assert_eq!(validate_note_id(-1), Err(NoteError::InvalidId));
        assert_eq!(validate_note_id(42), Ok(()));
    }

    #[test]
    fn test_create_title_required() {
        assert_eq!(
            validate_new_note(&NewNote::new("", "body")),
            Err(NoteError::TitleRequired)
        );
        assert_eq!(
            validate_new_note(&NewNote::new(" \t\n", "body")),
            Err(NoteError::TitleRequired)
        );
    }

    #[test]
    fn test_create_title_boundary() {
        assert_eq!(validate_new_note(&NewNote::new(text(255), "")), Ok(()));
        assert_eq!(
            validate_new_note(&NewNote::new(text(256), "")),
            Err(NoteError::TitleTooLong)
        );
    }

    #[test]
    fn test_create_title_length_counts_surrounding_whitespace() {
        let title = format!(" {} ", text(254));
        assert_eq!(
            validate_new_note(&NewNote::new(title, "")),
            Err(NoteError::TitleTooLong)
        );
    }

    #[test]
    fn test_create_content_boundary() {
        assert_eq!(validate_new_note(&NewNote::new("t", text(5000))), Ok(()));
        assert_eq!(
            validate_new_note(&NewNote::new("t", text(5001))),
            Err(NoteError::ContentTooLong)
        );
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let title = "ж".repeat(255);
        assert!(title.len() > 255);
        assert_eq!(validate_new_note(&NewNote::new(title, "")), Ok(()));
    }

    #[test]
    fn test_update_requires_a_field() {
        assert_eq!(
            validate_update(&NoteUpdate::default()),
            Err(NoteError::NothingToUpdate)
        );
    }

    #[test]
    fn test_update_title_boundary() {
        assert_eq!(validate_update(&NoteUpdate::default().title(text(250))), Ok(()));
        assert_eq!(
            validate_update(&NoteUpdate::default().title(text(251))),
            Err(NoteError::TitleTooLong)
        );
    }

    #[test]
    fn test_update_title_length_counts_surrounding_whitespace() {
        let padded = format!("  {}  ", text(248));
        assert_eq!(
            validate_update(&NoteUpdate::default().title(padded)),
            Err(NoteError::TitleTooLong)
        );

        let mostly_padding = format!("A{}", " ".repeat(1000));
        assert_eq!(
            validate_update(&NoteUpdate::default().title(mostly_padding)),
            Err(NoteError::TitleTooLong)
        );
    }

    #[test]
    fn test_update_whitespace_title_rejected() {
        assert_eq!(
            validate_update(&NoteUpdate::default().title("   ")),
            Err(NoteError::TitleRequired)
        );
    }

    #[test]
    fn test_update_content_boundary() {
        assert_eq!(
            validate_update(&NoteUpdate::default().content(text(5000))),
            Ok(())
        );
        assert_eq!(
            validate_update(&NoteUpdate::default().content(text(5001))),
            Err(NoteError::ContentTooLong)
        );
    }

    #[test]
    fn test_update_allows_empty_content() {
        assert_eq!(validate_update(&NoteUpdate::default().content("")), Ok(()));
    }
}
