//! Axum extractor for RequestContext.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use notekeeper_auth::request_id_from_headers;

use super::types::{RequestContext, RequestId};

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The request-id layer runs first, so a fresh id is only generated
        // when the handler is exercised without the full middleware stack.
        let request_id = request_id_from_headers(&parts.headers)
            .map(RequestId::from)
            .unwrap_or_default();

        Ok(RequestContext { request_id })
    }
}
