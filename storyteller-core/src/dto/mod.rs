//! Data Transfer Objects sent to the backend API
//!
//! DTOs are the request bodies for generation endpoints. Response payloads
//! live in [`crate::domain`].

pub mod image;
pub mod script;
pub mod voiceover;
