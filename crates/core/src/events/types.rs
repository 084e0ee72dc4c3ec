use serde::{Deserialize, Serialize};

use crate::notes::UserId;

use super::{EventError, Result};

/// Published once per newly registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEvent {
    pub user_id: UserId,
    pub email: String,
}

impl RegistrationEvent {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Decodes an event from its JSON wire form.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| EventError::Decode(e.to_string()))
    }

    /// Encodes the event to its JSON wire form.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| EventError::Encode(e.to_string()))
    }
}

/// A raw message handed out by an event source.
///
/// `id` is transport-specific and is what gets acknowledged back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub id: String,
    pub payload: Vec<u8>,
}

impl Delivery {
    pub fn new(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}
