//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use notekeeper_core::notes::UserId;

use crate::error::Unauthorized;
use crate::AuthState;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extractor for the authenticated user id. Rejects with 401 when the bearer
/// credential is absent or fails verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let request_id = request_id_from_headers(&parts.headers);

        let Some(token) = bearer_token(&parts.headers) else {
            tracing::debug!(request_id = ?request_id, "Missing or malformed authorization header");
            return Err(Unauthorized::new(request_id));
        };

        let user_id = auth_state
            .tokens
            .verify(token)
            .map_err(|_| Unauthorized::new(request_id))?;

        Ok(CurrentUser(user_id))
    }
}

/// Returns the token of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Returns the correlation id of the request, if one was set.
pub fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
