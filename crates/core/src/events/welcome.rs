use crate::notes::NewNote;

use super::RegistrationEvent;

/// Title of the note created for every new user.
pub const WELCOME_TITLE: &str = "Welcome!";

pub fn welcome_content(email: &str) -> String {
    format!("Hi, {email}! This is your first note.")
}

/// Builds the welcome note for a registration.
pub fn welcome_note(event: &RegistrationEvent) -> NewNote {
    NewNote::new(WELCOME_TITLE, welcome_content(&event.email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::validate_new_note;

    #[test]
    fn test_welcome_content_mentions_email() {
        assert_eq!(
            welcome_content("ann@example.com"),
            "Hi, ann@example.com! This is your first note."
        );
    }

    #[test]
    fn test_welcome_note_is_valid() {
        let note = welcome_note(&RegistrationEvent::new(1, "ann@example.com"));
        assert_eq!(note.title, WELCOME_TITLE);
        assert_eq!(validate_new_note(&note), Ok(()));
    }
}
