//! Functional core for notekeeper.
//!
//! Pure types, validation rules, error classification and the traits that the
//! I/O shell implements. Nothing in this crate touches the network or disk.

pub mod cache;
pub mod events;
pub mod notes;
pub mod storage;
