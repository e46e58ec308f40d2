//! Core domain types
//!
//! These types mirror the payloads returned by the backend API and the
//! client-side state derived from them. They are shared between the HTTP
//! client (for deserialization) and the studio layer (for tracking).

pub mod project;
pub mod render;
pub mod script;
pub mod voiceover;
