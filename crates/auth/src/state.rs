//! Shared state for authentication.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::token::TokenService;

/// Shared state for the auth extractors.
///
/// Embedded in the application state and exposed through `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            tokens: Arc::new(TokenService::new(config)),
        }
    }
}
