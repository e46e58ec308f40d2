//! Image command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use storyteller_core::domain::script::Scene;
use storyteller_studio::StudioConfig;

/// Image subcommands
#[derive(Subcommand)]
pub enum ImageCommands {
    /// Generate an illustration for a scene
    Generate {
        /// Scene number within the script
        #[arg(long)]
        scene_number: u32,

        /// What happens in the scene
        #[arg(long)]
        description: String,

        /// Visual style (default: cinematic)
        #[arg(long)]
        style: Option<String>,
    },
}

/// Handle image commands
pub async fn handle_image_command(command: ImageCommands, config: &StudioConfig) -> Result<()> {
    let client = config.build_client()?;

    match command {
        ImageCommands::Generate {
            scene_number,
            description,
            style,
        } => {
            let scene = Scene {
                scene_number,
                action: description,
                dialogues: Vec::new(),
                voiceover: None,
                notes: None,
                duration: None,
            };

            let image = client.generate_scene_image(&scene, style.as_deref()).await?;

            println!("{}", "Image generated:".bold());
            println!("  Scene:  {}", image.scene_id);
            println!("  Style:  {}", image.style.cyan());
            println!("  Prompt: {}", image.prompt.dimmed());
            println!("  URL:    {}", image.image_url.green());
            Ok(())
        }
    }
}
