use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use notekeeper_auth::request_id_from_headers;
use notekeeper_core::notes::{note_error_to_status_code, public_message, ErrorKind, NoteError};

use crate::context::RequestId;

/// Error response rendered as `{"error": ..., "request_id": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub request_id: RequestId,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, request_id: &RequestId) -> Self {
        Self {
            status,
            message: message.into(),
            request_id: request_id.clone(),
        }
    }

    pub fn bad_request(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, request_id)
    }

    /// Maps a service error, logging the detail that the client never sees.
    pub fn from_note_error(err: NoteError, request_id: &RequestId) -> Self {
        let status = StatusCode::from_u16(note_error_to_status_code(&err))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err.kind() {
            ErrorKind::Internal | ErrorKind::Unavailable => {
                tracing::error!(%request_id, error = %err, "Note operation failed")
            }
            _ => tracing::debug!(%request_id, error = %err, "Note request rejected"),
        }

        Self::new(status, public_message(&err), request_id)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.message,
                "request_id": self.request_id.as_str(),
            })),
        )
            .into_response()
    }
}

/// Gives error responses produced outside the handlers the same JSON shape.
///
/// Timeouts, unknown routes and unsupported methods come back from the router
/// and middleware without a body. Responses that already declare a content
/// type are left alone.
pub async fn render_bare_errors(request: Request, next: Next) -> Response {
    let request_id = request_id_from_headers(request.headers())
        .map(RequestId::from)
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let message = match status {
        StatusCode::REQUEST_TIMEOUT => "request timed out".to_string(),
        StatusCode::NOT_FOUND => "not found".to_string(),
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed".to_string(),
        other => other
            .canonical_reason()
            .unwrap_or("request failed")
            .to_lowercase(),
    };
    tracing::debug!(%request_id, status = status.as_u16(), "Rendering bare error response");

    let mut rendered = ApiError::new(status, message, &request_id).into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        rendered.headers_mut().insert(header::ALLOW, allow.clone());
    }
    rendered
}
