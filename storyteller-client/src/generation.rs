//! Script and image generation endpoints

use crate::ApiClient;
use crate::error::Result;
use reqwest::Method;
use storyteller_core::domain::script::{ImageGeneration, Scene, Script};
use storyteller_core::dto::image::GenerateImage;
use storyteller_core::dto::script::{GenerateScript, ScriptOptions};
use tracing::{debug, error};

impl ApiClient {
    // =============================================================================
    // Script Generation
    // =============================================================================

    /// Generate a video script from a free-form idea
    ///
    /// # Arguments
    /// * `idea` - What the video should be about
    /// * `options` - Tone, duration, style and audience; unset values use defaults
    ///
    /// # Returns
    /// The generated script, validated against the expected shape
    pub async fn generate_script(&self, idea: &str, options: ScriptOptions) -> Result<Script> {
        let body = GenerateScript::new(idea, options);
        debug!(tone = %body.tone, duration = body.duration, "Requesting script generation");

        let response = self
            .request(Method::POST, "/script/generate")
            .await
            .json(&body)
            .send()
            .await?;

        self.handle_response(response, "Failed to generate script")
            .await
            .inspect_err(|e| error!("Script generation failed: {}", e))
    }

    // =============================================================================
    // Image Generation
    // =============================================================================

    /// Generate an illustration for a scene
    ///
    /// # Arguments
    /// * `scene` - The scene to illustrate; its action becomes the prompt
    /// * `style` - Visual style, `cinematic` when `None`
    pub async fn generate_scene_image(
        &self,
        scene: &Scene,
        style: Option<&str>,
    ) -> Result<ImageGeneration> {
        let body = GenerateImage::for_scene(scene, style);

        let response = self
            .request(Method::POST, "/image/generate")
            .await
            .json(&body)
            .send()
            .await?;

        self.handle_response(response, "Failed to generate image")
            .await
            .inspect_err(|e| error!("Image generation failed: {}", e))
    }
}
