//! Image generation DTOs

use serde::{Deserialize, Serialize};

use crate::domain::script::Scene;

/// Request body for the scene image endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImage {
    pub scene_description: String,
    pub style: String,
    pub scene_number: u32,
}

impl GenerateImage {
    pub const DEFAULT_STYLE: &'static str = "cinematic";

    /// Builds a request describing the scene's action
    pub fn for_scene(scene: &Scene, style: Option<&str>) -> Self {
        Self {
            scene_description: scene.action.clone(),
            style: style.unwrap_or(Self::DEFAULT_STYLE).to_string(),
            scene_number: scene.scene_number,
        }
    }
}
