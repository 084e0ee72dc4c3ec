//! Request-scoped context module.
//!
//! Provides the `RequestContext` extractor that bundles request-scoped values
//! to complement the application-scoped `AppState`.

mod extractor;
mod types;

pub use types::{RequestContext, RequestId};
