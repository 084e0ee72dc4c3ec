#[cfg(debug_assertions)]
pub mod dev;
pub mod error;
pub mod health;
pub mod notes;

pub use error::ApiError;
