//! Script and scene types returned by the generation endpoints

use serde::{Deserialize, Serialize};

/// A single scene of a generated script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_number: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialogues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voiceover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Scene duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// A generated video script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    pub description: String,
    pub tone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    pub scenes: Vec<Scene>,
}

impl Script {
    /// Sum of all known scene durations, in seconds
    pub fn total_duration(&self) -> f64 {
        self.scenes.iter().filter_map(|s| s.duration).sum()
    }
}

/// Result of generating an illustration for a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeneration {
    pub scene_id: u32,
    pub image_url: String,
    pub prompt: String,
    pub style: String,
}
