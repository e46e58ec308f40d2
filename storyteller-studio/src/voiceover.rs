//! Voiceover generation state

use std::sync::Arc;

use serde_json::Value as JsonValue;
use storyteller_client::{ClientError, VoiceoverApi};
use storyteller_core::domain::script::Scene;
use storyteller_core::domain::voiceover::Voiceover;
use tokio::sync::watch;
use tracing::{error, info};

/// Observable state of a [`VoiceoverSession`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceoverState {
    pub audio_url: Option<String>,
    pub subtitles: Option<JsonValue>,
    pub is_generating: bool,
}

/// Tracks narration generation for a project
pub struct VoiceoverSession {
    api: Arc<dyn VoiceoverApi>,
    state: watch::Sender<VoiceoverState>,
}

/// Clears `is_generating` however the request ends, including cancellation
struct GeneratingGuard<'a>(&'a watch::Sender<VoiceoverState>);

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|state| state.is_generating = false);
    }
}

impl VoiceoverSession {
    pub fn new(api: Arc<dyn VoiceoverApi>) -> Self {
        let (state, _) = watch::channel(VoiceoverState::default());
        Self { api, state }
    }

    /// Generates narration for `scenes` and stores the result
    ///
    /// On failure the previous result is kept and the error is returned.
    pub async fn generate(&self, project_id: &str, scenes: &[Scene]) -> Result<Voiceover, ClientError> {
        self.state.send_modify(|state| state.is_generating = true);
        let _guard = GeneratingGuard(&self.state);

        info!("Generating voiceover for project {} ({} scenes)", project_id, scenes.len());

        match self.api.generate_voiceover(project_id, scenes).await {
            Ok(voiceover) => {
                self.state.send_modify(|state| {
                    state.audio_url = Some(voiceover.audio_url.clone());
                    state.subtitles = voiceover.subtitles.clone();
                });
                Ok(voiceover)
            }
            Err(e) => {
                error!("Voiceover generation for project {} failed: {}", project_id, e);
                Err(e)
            }
        }
    }

    pub fn state(&self) -> VoiceoverState {
        self.state.borrow().clone()
    }

    pub fn is_generating(&self) -> bool {
        self.state.borrow().is_generating
    }

    pub fn subscribe(&self) -> watch::Receiver<VoiceoverState> {
        self.state.subscribe()
    }
}
