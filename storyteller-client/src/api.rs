//! Narrow API traits used by the studio layer
//!
//! Trackers depend on these traits rather than on [`ApiClient`] directly so
//! they can be driven by in-memory fakes in tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use storyteller_core::domain::render::RenderStatus;
use storyteller_core::domain::script::Scene;
use storyteller_core::domain::voiceover::Voiceover;

use crate::ApiClient;
use crate::error::Result;

/// Render submission and status queries
#[async_trait]
pub trait RenderApi: Send + Sync {
    /// Submit a render job; success means the backend accepted it
    async fn submit_render(&self, job_id: &str, settings: &JsonValue) -> Result<()>;

    /// Query the status of a render job
    async fn render_status(&self, job_id: &str) -> Result<RenderStatus>;
}

/// Voiceover generation
#[async_trait]
pub trait VoiceoverApi: Send + Sync {
    async fn generate_voiceover(&self, project_id: &str, scenes: &[Scene]) -> Result<Voiceover>;
}

#[async_trait]
impl RenderApi for ApiClient {
    async fn submit_render(&self, job_id: &str, settings: &JsonValue) -> Result<()> {
        self.start_render(job_id, settings).await
    }

    async fn render_status(&self, job_id: &str) -> Result<RenderStatus> {
        self.get_render_status(job_id).await
    }
}

#[async_trait]
impl VoiceoverApi for ApiClient {
    async fn generate_voiceover(&self, project_id: &str, scenes: &[Scene]) -> Result<Voiceover> {
        ApiClient::generate_voiceover(self, project_id, scenes).await
    }
}
