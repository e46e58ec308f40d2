//! Video render endpoints

use crate::error::Result;
use crate::{ApiClient, path_segment};
use reqwest::Method;
use serde_json::Value as JsonValue;
use storyteller_core::domain::render::RenderStatus;

impl ApiClient {
    // =============================================================================
    // Rendering
    // =============================================================================

    /// Submit a project for rendering
    ///
    /// # Arguments
    /// * `project_id` - The project (render job) to render
    /// * `settings` - Render settings, passed through as-is
    ///
    /// Any 2xx response counts as accepted; the body is ignored.
    pub async fn start_render(&self, project_id: &str, settings: &JsonValue) -> Result<()> {
        let path = format!("/projects/{}/render", path_segment("project", project_id)?);
        let response = self
            .request(Method::POST, &path)
            .await
            .json(settings)
            .send()
            .await?;

        self.handle_empty_response(response, "Failed to start render")
            .await
    }

    /// Get the current render status of a project
    pub async fn get_render_status(&self, project_id: &str) -> Result<RenderStatus> {
        let path = format!("/projects/{}/status", path_segment("project", project_id)?);
        let response = self.request(Method::GET, &path).await.send().await?;

        self.handle_response(response, "Failed to fetch render status")
            .await
    }
}
