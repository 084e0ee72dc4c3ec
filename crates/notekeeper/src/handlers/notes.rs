//! Note CRUD handlers.
//!
//! Every handler takes `CurrentUser` before any other fallible extractor, so
//! an unauthenticated request is rejected before its path or body is looked at.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};

use notekeeper_auth::CurrentUser;
use notekeeper_core::notes::{
    CreateNoteRequest, CreatedNote, Note, NoteError, NoteId, UpdateNoteRequest,
};

use crate::{context::RequestContext, handlers::ApiError, state::AppState};

fn note_id(
    path: Result<Path<NoteId>, PathRejection>,
    ctx: &RequestContext,
) -> Result<NoteId, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(request_id = %ctx.request_id, error = %rejection, "Malformed note id");
        ApiError::bad_request(NoteError::InvalidId.to_string(), &ctx.request_id)
    })
}

fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    ctx: &RequestContext,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(request_id = %ctx.request_id, error = %rejection, "Malformed JSON body");
        ApiError::bad_request("invalid JSON", &ctx.request_id)
    })
}

/// GET /notes
#[axum::debug_handler]
pub async fn list_notes(
    ctx: RequestContext,
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state
        .notes
        .list_notes(user_id)
        .await
        .map_err(|e| ApiError::from_note_error(e, &ctx.request_id))?;
    Ok(Json(notes))
}

/// GET /notes/{id}
#[axum::debug_handler]
pub async fn get_note(
    ctx: RequestContext,
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<NoteId>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = note_id(path, &ctx)?;
    let note = state
        .notes
        .get_note(user_id, id)
        .await
        .map_err(|e| ApiError::from_note_error(e, &ctx.request_id))?;
    Ok(Json(note))
}

/// POST /notes
#[axum::debug_handler]
pub async fn create_note(
    ctx: RequestContext,
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    body: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(body, &ctx)?;
    let id = state
        .notes
        .create_note(user_id, request.into_new_note())
        .await
        .map_err(|e| ApiError::from_note_error(e, &ctx.request_id))?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/notes/{id}"))],
        Json(CreatedNote { id }),
    ))
}

/// PATCH /notes/{id}
#[axum::debug_handler]
pub async fn update_note(
    ctx: RequestContext,
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<NoteId>, PathRejection>,
    body: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = note_id(path, &ctx)?;
    let request = json_body(body, &ctx)?;
    let note = state
        .notes
        .update_note(user_id, id, request.into_update())
        .await
        .map_err(|e| ApiError::from_note_error(e, &ctx.request_id))?;
    Ok(Json(note))
}

/// DELETE /notes/{id}
#[axum::debug_handler]
pub async fn delete_note(
    ctx: RequestContext,
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<NoteId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = note_id(path, &ctx)?;
    state
        .notes
        .delete_note(user_id, id)
        .await
        .map_err(|e| ApiError::from_note_error(e, &ctx.request_id))?;
    Ok(StatusCode::NO_CONTENT)
}
