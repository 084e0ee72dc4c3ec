//! Development-only handlers.
//!
//! Compiled into debug builds only. Lets a developer drive the registration
//! flow without running the user service.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use notekeeper_core::events::RegistrationEvent;
use notekeeper_core::notes::UNAVAILABLE_ERROR_MESSAGE;

use crate::{context::RequestContext, handlers::ApiError, state::AppState};

/// POST /_dev/registrations - Publish a registration event.
#[axum::debug_handler]
pub async fn publish_registration(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(event): Json<RegistrationEvent>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let event_id = state.publisher.publish(&event).await.map_err(|err| {
        tracing::error!(request_id = %ctx.request_id, error = %err, "Failed to publish registration");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            UNAVAILABLE_ERROR_MESSAGE,
            &ctx.request_id,
        )
    })?;

    tracing::info!(request_id = %ctx.request_id, %event_id, user_id = event.user_id, "Registration published");
    Ok((StatusCode::ACCEPTED, Json(json!({ "id": event_id }))))
}
