use std::time::Duration;

use axum::{
    http::{header, Method, Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use notekeeper_auth::REQUEST_ID_HEADER;

use crate::{
    handlers::{
        error::render_bare_errors,
        health::health,
        notes::{create_note, delete_note, get_note, list_notes, update_note},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::LOCATION]);

    let note_routes = Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).patch(update_note).delete(delete_note),
        )
        .layer(cors);

    let router = Router::new()
        .route("/health", get(health))
        .merge(note_routes);

    #[cfg(debug_assertions)]
    let router = router.route(
        "/_dev/registrations",
        axum::routing::post(crate::handlers::dev::publish_registration),
    );

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        tracing::info_span!(
            "request",
            request_id,
            method = %request.method(),
            path = %request.uri().path(),
        )
    });

    // Layers run bottom-up: the request id is set before the trace span opens,
    // and bare error responses (timeout, unknown route) are rendered inside it.
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(render_bare_errors))
        .layer(trace)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use std::sync::Arc;

    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use notekeeper_auth::{AuthState, TokenService};
    use notekeeper_core::events::{RegistrationSource, WELCOME_TITLE};
    use notekeeper_core::notes::{NewNote, Note, NoteId, NoteUpdate, UserId};
    use notekeeper_core::storage::{NoteRepository, RepositoryError, Result as RepoResult};

    use crate::events::memory::MemorySource;
    use crate::state::test_support::test_auth_config;

    fn test_app() -> (Router, AppState, MemorySource) {
        let (state, source) = AppState::for_tests();
        let app = create_app(state.clone(), Duration::from_secs(10));
        (app, state, source)
    }

    fn token(state: &AppState, user_id: i64) -> String {
        state.auth.tokens.issue(user_id).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _source) = test_app();

        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_notes_require_auth() {
        let (app, _, _source) = test_app();

        for (method, uri) in [
            ("GET", "/notes"),
            ("GET", "/notes/1"),
            ("POST", "/notes"),
            ("PATCH", "/notes/1"),
            ("DELETE", "/notes/1"),
        ] {
            let response = app
                .clone()
                .oneshot(request(method, uri, None, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");

            let request_id = response
                .headers()
                .get("x-request-id")
                .unwrap()
                .to_str()
                .unwrap()
                .to_string();
            let body = json_body(response).await;
            assert_eq!(body["error"], "unauthorized");
            assert_eq!(body["request_id"], request_id);
        }
    }

    #[tokio::test]
    async fn test_garbage_and_foreign_tokens_are_rejected() {
        let (app, _, _source) = test_app();
        let other_secret = TokenService::new(&notekeeper_auth::AuthConfig::new(
            "another-secret",
            Duration::from_secs(3600),
        ))
        .issue(7)
        .unwrap();

        for token in ["garbage", other_secret.as_str()] {
            let response = app
                .clone()
                .oneshot(request("GET", "/notes", Some(token), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let (app, state, _source) = test_app();
        let issued = chrono::Utc::now() - chrono::Duration::hours(25);
        let expired = state.auth.tokens.issue_at(7, issued).unwrap();

        let response = app
            .oneshot(request("GET", "/notes", Some(&expired), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let (app, _, _source) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notes/1")
                    .header("x-request-id", "trace-me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-me");
        assert_eq!(json_body(response).await["request_id"], "trace-me");
    }

    /// Store that takes longer than any request timeout used here.
    struct StalledRepository;

    impl StalledRepository {
        async fn stall<T>() -> RepoResult<T> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Err(RepositoryError::QueryFailed("stalled".to_string()))
        }
    }

    #[async_trait]
    impl NoteRepository for StalledRepository {
        async fn list_by_owner(&self, _: UserId) -> RepoResult<Vec<Note>> {
            Self::stall().await
        }

        async fn get(&self, _: UserId, _: NoteId) -> RepoResult<Note> {
            Self::stall().await
        }

        async fn insert(&self, _: UserId, _: &NewNote) -> RepoResult<NoteId> {
            Self::stall().await
        }

        async fn update(&self, _: UserId, _: NoteId, _: &NoteUpdate) -> RepoResult<Note> {
            Self::stall().await
        }

        async fn delete(&self, _: UserId, _: NoteId) -> RepoResult<()> {
            Self::stall().await
        }
    }

    #[tokio::test]
    async fn test_timeout_renders_json_error() {
        let (state, _source) = AppState::for_tests_with_repo(Arc::new(StalledRepository));
        let app = create_app(state.clone(), Duration::from_millis(50));
        let token = token(&state, 7);

        let mut req = request("GET", "/notes", Some(&token), None);
        req.headers_mut()
            .insert("x-request-id", "rid-1".parse().unwrap());
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()["x-request-id"], "rid-1");
        assert_eq!(
            json_body(response).await,
            json!({"error": "request timed out", "request_id": "rid-1"})
        );
    }

    #[tokio::test]
    async fn test_unknown_route_renders_json_error() {
        let (app, _, _source) = test_app();

        let response = app
            .oneshot(request("GET", "/nope", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let request_id = response.headers()["x-request-id"]
            .to_str()
            .unwrap()
            .to_string();
        let body = json_body(response).await;
        assert_eq!(body["error"], "not found");
        assert_eq!(body["request_id"], request_id);
    }

    #[tokio::test]
    async fn test_unsupported_method_renders_json_error() {
        let (app, state, _source) = test_app();
        let token = token(&state, 7);

        let response = app
            .oneshot(request("PUT", "/notes/1", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        let body = json_body(response).await;
        assert_eq!(body["error"], "method not allowed");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_crud_flow() {
        let (app, state, _source) = test_app();
        let token = token(&state, 7);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/notes",
                Some(&token),
                Some(json!({"title": "A", "content": "B"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["location"], "/notes/1");
        assert_eq!(json_body(response).await, json!({"id": 1}));

        let response = app
            .clone()
            .oneshot(request("GET", "/notes", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([{"id": 1, "user_id": 7, "title": "A", "content": "B"}])
        );

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                "/notes/1",
                Some(&token),
                Some(json!({"title": "C"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "user_id": 7, "title": "C", "content": "B"})
        );

        let response = app
            .clone()
            .oneshot(request("GET", "/notes", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await[0]["title"], "C");

        let response = app
            .clone()
            .oneshot(request("DELETE", "/notes/1", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());

        let response = app
            .oneshot(request("GET", "/notes/1", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "note not found");
    }

    #[tokio::test]
    async fn test_other_users_note_is_not_found() {
        let (app, state, _source) = test_app();
        let owner = token(&state, 1);
        let intruder = token(&state, 2);

        app.clone()
            .oneshot(request(
                "POST",
                "/notes",
                Some(&owner),
                Some(json!({"title": "mine", "content": ""})),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request("GET", "/notes/1", Some(&intruder), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request("DELETE", "/notes/1", Some(&intruder), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_input_is_400() {
        let (app, state, _source) = test_app();
        let token = token(&state, 7);

        let response = app
            .clone()
            .oneshot(request("GET", "/notes/abc", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "invalid note ID");

        let response = app
            .clone()
            .oneshot(request("GET", "/notes/0", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "invalid note ID");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notes")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "invalid JSON");

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/notes",
                Some(&token),
                Some(json!({"title": "  ", "content": "x"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "title is required");

        let response = app
            .oneshot(request("PATCH", "/notes/1", Some(&token), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "nothing to update");
    }

    #[tokio::test]
    async fn test_auth_state_from_ref() {
        let (_, state, _source) = test_app();
        let auth = <AuthState as axum::extract::FromRef<AppState>>::from_ref(&state);
        let token = TokenService::new(&test_auth_config()).issue(3).unwrap();

        assert_eq!(auth.tokens.verify(&token), Ok(3));
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    async fn test_dev_registration_route_publishes() {
        let (app, _, mut source) = test_app();

        let response = app
            .oneshot(request(
                "POST",
                "/_dev/registrations",
                None,
                Some(json!({"user_id": 12, "email": "dev@example.com"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let batch = source.receive().await.unwrap();
        assert_eq!(batch.len(), 1);
        let event = notekeeper_core::events::RegistrationEvent::decode(&batch[0].payload).unwrap();
        assert_eq!(event.user_id, 12);
    }

    #[tokio::test]
    async fn test_registration_to_welcome_note_end_to_end() {
        let (app, state, source) = test_app();
        let handle = crate::events::spawn_consumer(
            source,
            state.notes.clone(),
            state.subscribe_shutdown(),
            Duration::from_millis(10),
        );

        state
            .publisher
            .publish(&notekeeper_core::events::RegistrationEvent::new(
                21,
                "welcome@example.com",
            ))
            .await
            .unwrap();

        let token = token(&state, 21);
        let mut notes = Value::Null;
        for _ in 0..200 {
            let response = app
                .clone()
                .oneshot(request("GET", "/notes", Some(&token), None))
                .await
                .unwrap();
            notes = json_body(response).await;
            if notes.as_array().is_some_and(|n| !n.is_empty()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let notes = notes.as_array().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0]["title"], WELCOME_TITLE);

        state.signal_shutdown();
        handle.await.unwrap();
    }
}
