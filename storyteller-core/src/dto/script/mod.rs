//! Script generation DTOs

use serde::{Deserialize, Serialize};

/// Request body for the script generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateScript {
    pub idea: String,
    pub tone: String,
    /// Target length in seconds
    pub duration: u32,
    pub style: String,
    pub target_audience: String,
}

/// Optional knobs for script generation
///
/// Unset fields fall back to the defaults the product ships with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    pub tone: Option<String>,
    pub duration: Option<u32>,
    pub style: Option<String>,
    pub target_audience: Option<String>,
}

impl GenerateScript {
    pub const DEFAULT_TONE: &'static str = "neutral";
    pub const DEFAULT_DURATION: u32 = 30;
    pub const DEFAULT_STYLE: &'static str = "cinematic";
    pub const DEFAULT_AUDIENCE: &'static str = "general";

    /// Builds a request, filling unset options with defaults
    pub fn new(idea: impl Into<String>, options: ScriptOptions) -> Self {
        Self {
            idea: idea.into(),
            tone: options
                .tone
                .unwrap_or_else(|| Self::DEFAULT_TONE.to_string()),
            duration: options.duration.unwrap_or(Self::DEFAULT_DURATION),
            style: options
                .style
                .unwrap_or_else(|| Self::DEFAULT_STYLE.to_string()),
            target_audience: options
                .target_audience
                .unwrap_or_else(|| Self::DEFAULT_AUDIENCE.to_string()),
        }
    }
}
