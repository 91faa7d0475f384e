//! Use-case services over repository contracts.
//!
//! Services stay storage-agnostic: they are generic over repository traits
//! and never see a connection.

pub mod calendar_service;
pub mod note_service;
