//! Voiceover DTOs

use serde::{Deserialize, Serialize};

use crate::domain::script::Scene;

/// Request body for the voiceover endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateVoiceover {
    pub scenes: Vec<Scene>,
}
