//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /health - Returns 200 as long as the server accepts connections.
#[axum::debug_handler]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
