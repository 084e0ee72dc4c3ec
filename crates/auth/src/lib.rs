//! Bearer token authentication for notekeeper.
//!
//! This crate provides:
//! - HS256 token issuance and verification
//! - An Axum extractor binding each request to the authenticated user id

mod config;
mod error;
mod extractors;
mod state;
mod token;

pub use config::AuthConfig;
pub use error::{AuthError, Unauthorized};
pub use extractors::{bearer_token, request_id_from_headers, CurrentUser, REQUEST_ID_HEADER};
pub use state::AuthState;
pub use token::{Claims, TokenService};
