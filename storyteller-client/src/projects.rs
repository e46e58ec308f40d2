//! Project and voiceover endpoints

use crate::error::Result;
use crate::{ApiClient, path_segment};
use reqwest::Method;
use serde_json::Value as JsonValue;
use storyteller_core::domain::project::Project;
use storyteller_core::domain::script::Scene;
use storyteller_core::domain::voiceover::Voiceover;
use storyteller_core::dto::voiceover::GenerateVoiceover;

impl ApiClient {
    // =============================================================================
    // Projects
    // =============================================================================

    /// Save a project
    ///
    /// The payload is passed through untouched; the backend owns its schema.
    ///
    /// # Returns
    /// The stored project
    pub async fn save_project(&self, project: &JsonValue) -> Result<Project> {
        let response = self
            .request(Method::POST, "/projects")
            .await
            .json(project)
            .send()
            .await?;

        self.handle_response(response, "Failed to save project").await
    }

    /// List the current user's projects
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let response = self.request(Method::GET, "/projects").await.send().await?;

        self.handle_response(response, "Failed to load projects").await
    }

    /// Get a project by ID
    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        let path = format!("/projects/{}", path_segment("project", project_id)?);
        let response = self.request(Method::GET, &path).await.send().await?;

        self.handle_response(response, "Failed to load project").await
    }

    // =============================================================================
    // Voiceover
    // =============================================================================

    /// Generate narration audio for the given scenes of a project
    ///
    /// # Returns
    /// The audio URL and subtitle track
    pub async fn generate_voiceover(&self, project_id: &str, scenes: &[Scene]) -> Result<Voiceover> {
        let path = format!("/projects/{}/voiceover", path_segment("project", project_id)?);
        let response = self
            .request(Method::POST, &path)
            .await
            .json(&GenerateVoiceover {
                scenes: scenes.to_vec(),
            })
            .send()
            .await?;

        self.handle_response(response, "Failed to generate voiceover").await
    }
}
