//! Voiceover domain model

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Narration audio generated for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voiceover {
    pub audio_url: String,
    /// Subtitle track in whatever shape the backend produces
    #[serde(default)]
    pub subtitles: Option<JsonValue>,
}
