//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod image;
mod project;
mod render;
mod script;
mod voiceover;

pub use image::ImageCommands;
pub use project::ProjectCommands;
pub use render::RenderCommands;
pub use script::ScriptCommands;
pub use voiceover::VoiceoverCommands;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use serde::de::DeserializeOwned;
use storyteller_studio::{Notification, NotificationKind, StudioConfig};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Script generation
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },
    /// Scene image generation
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Voiceover generation
    Voiceover {
        #[command(subcommand)]
        command: VoiceoverCommands,
    },
    /// Video rendering
    Render {
        #[command(subcommand)]
        command: RenderCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &StudioConfig) -> Result<()> {
    match command {
        Commands::Script { command } => script::handle_script_command(command, config).await,
        Commands::Image { command } => image::handle_image_command(command, config).await,
        Commands::Project { command } => project::handle_project_command(command, config).await,
        Commands::Voiceover { command } => {
            voiceover::handle_voiceover_command(command, config).await
        }
        Commands::Render { command } => render::handle_render_command(command, config).await,
    }
}

/// Read and parse a JSON file given on the command line
fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Print a notification the way a toast would show it
fn print_notification(notification: &Notification) {
    if !notification.visible {
        return;
    }

    let (icon, message) = match notification.kind {
        NotificationKind::Error => ("✗".red(), notification.message.red()),
        NotificationKind::Success => ("✓".green(), notification.message.green()),
        NotificationKind::Info => ("ℹ".cyan(), notification.message.normal()),
    };
    println!("{} {}", icon, message);
}
