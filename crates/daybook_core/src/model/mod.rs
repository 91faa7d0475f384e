//! Domain records for users and their notes.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Write models validate themselves before any repository mutation.

pub mod note;
pub mod user;
