//! Voiceover command handlers

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use storyteller_core::domain::script::Scene;
use storyteller_studio::{StudioConfig, VoiceoverSession};
use tracing::debug;

use super::read_json_file;

/// Voiceover subcommands
#[derive(Subcommand)]
pub enum VoiceoverCommands {
    /// Generate narration for a project
    Generate {
        /// Project ID
        project_id: String,

        /// JSON file with the scenes to narrate
        #[arg(long)]
        scenes: PathBuf,
    },
}

/// Handle voiceover commands
pub async fn handle_voiceover_command(
    command: VoiceoverCommands,
    config: &StudioConfig,
) -> Result<()> {
    let client = Arc::new(config.build_client()?);
    let session = VoiceoverSession::new(client);

    match command {
        VoiceoverCommands::Generate { project_id, scenes } => {
            debug!("Loading scenes from {}", scenes.display());
            let scenes: Vec<Scene> = read_json_file(&scenes)?;

            println!(
                "{}",
                format!("Generating voiceover for {} scene(s)...", scenes.len()).dimmed()
            );
            let voiceover = session.generate(&project_id, &scenes).await?;

            println!("{} Voiceover ready", "✓".green());
            println!("  Audio: {}", voiceover.audio_url.cyan());
            if voiceover.subtitles.is_some() {
                println!("  Subtitles included");
            }
            Ok(())
        }
    }
}
