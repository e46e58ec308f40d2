//! Project domain model
//!
//! A project is a saved idea together with its generated script and assets.
//! The backend fills most fields lazily, so nearly everything is optional.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A saved project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// The idea the user typed in
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub settings: Option<ProjectSettings>,
    #[serde(default)]
    pub script: Option<ProjectScript>,
    /// Generated images keyed by scene number
    #[serde(default)]
    pub images: HashMap<String, JsonValue>,
}

/// Generation settings stored with a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub style: String,
    /// Target length in seconds
    #[serde(default = "default_duration")]
    pub duration: f64,
}

fn default_duration() -> f64 {
    30.0
}

/// Script as stored with a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectScript {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub scenes: Vec<ProjectScene>,
}

/// Scene as stored with a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectScene {
    #[serde(default)]
    pub scene_number: Option<u32>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub dialogue: String,
    #[serde(default)]
    pub voice_over: String,
    #[serde(default)]
    pub visual_prompt: String,
}

impl Project {
    /// Display name, falling back to the project id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn scene_count(&self) -> usize {
        self.script.as_ref().map_or(0, |s| s.scenes.len())
    }
}
