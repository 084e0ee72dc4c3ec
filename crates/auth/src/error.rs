use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notekeeper_core::notes::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// Auth errors for the notekeeper_auth crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credential is missing, malformed, forged, expired or names no
    /// valid user. Callers are never told which.
    #[error("invalid credential")]
    InvalidCredential,

    /// A token could not be signed.
    #[error("failed to issue token: {0}")]
    Issue(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredential => ErrorKind::Authorization,
            AuthError::Issue(_) => ErrorKind::Internal,
        }
    }
}

/// Rejection returned by [`crate::CurrentUser`].
///
/// Always renders as `401 {"error":"unauthorized","request_id":...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthorized {
    pub request_id: Option<String>,
}

impl Unauthorized {
    pub fn new(request_id: Option<String>) -> Self {
        Self { request_id }
    }
}

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthorized",
                "request_id": self.request_id.unwrap_or_default(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::InvalidCredential.to_string(), "invalid credential");
        assert_eq!(
            AuthError::Issue("bad key".to_string()).to_string(),
            "failed to issue token: bad key"
        );
    }

    #[test]
    fn test_auth_error_kind() {
        assert_eq!(AuthError::InvalidCredential.kind(), ErrorKind::Authorization);
        assert_eq!(AuthError::Issue(String::new()).kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_unauthorized_response_body() {
        let response = Unauthorized::new(Some("req-1".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "unauthorized", "request_id": "req-1"})
        );
    }
}
