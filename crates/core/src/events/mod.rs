//! User registration events and the welcome note they produce.

mod error;
mod traits;
mod types;
mod welcome;

pub use error::{EventError, Result};
pub use traits::{RegistrationPublisher, RegistrationSource};
pub use types::{Delivery, RegistrationEvent};
pub use welcome::{welcome_content, welcome_note, WELCOME_TITLE};
