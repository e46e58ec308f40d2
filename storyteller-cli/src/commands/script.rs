//! Script command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use storyteller_core::domain::script::Script;
use storyteller_core::dto::script::ScriptOptions;
use storyteller_studio::StudioConfig;

/// Script subcommands
#[derive(Subcommand)]
pub enum ScriptCommands {
    /// Generate a script from an idea
    Generate {
        /// What the video should be about
        idea: String,

        /// Tone of voice (default: neutral)
        #[arg(long)]
        tone: Option<String>,

        /// Target length in seconds (default: 30)
        #[arg(long)]
        duration: Option<u32>,

        /// Visual style (default: cinematic)
        #[arg(long)]
        style: Option<String>,

        /// Target audience (default: general)
        #[arg(long)]
        audience: Option<String>,

        /// Print the raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

/// Handle script commands
pub async fn handle_script_command(command: ScriptCommands, config: &StudioConfig) -> Result<()> {
    let client = config.build_client()?;

    match command {
        ScriptCommands::Generate {
            idea,
            tone,
            duration,
            style,
            audience,
            json,
        } => {
            let options = ScriptOptions {
                tone,
                duration,
                style,
                target_audience: audience,
            };

            println!("{}", "Generating script...".dimmed());
            let script = client.generate_script(&idea, options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&script)?);
            } else {
                print_script(&script);
            }
            Ok(())
        }
    }
}

/// Print a generated script
fn print_script(script: &Script) {
    println!("{}", script.title.bold());
    println!("{}", script.description.dimmed());
    println!("  Tone:     {}", script.tone.cyan());
    if let Some(audience) = &script.target_audience {
        println!("  Audience: {}", audience.cyan());
    }
    let total = script.total_duration();
    if total > 0.0 {
        println!("  Duration: {}s", total);
    }
    println!();

    for scene in &script.scenes {
        println!("  {} Scene {}", "▸".cyan(), scene.scene_number.to_string().bold());
        println!("    {}", scene.action);
        for line in &scene.dialogues {
            println!("    {} {}", "»".dimmed(), line);
        }
        if let Some(voiceover) = &scene.voiceover {
            println!("    {} {}", "Voiceover:".dimmed(), voiceover.italic());
        }
        if let Some(notes) = &scene.notes {
            println!("    {} {}", "Notes:".dimmed(), notes.dimmed());
        }
        println!();
    }
}
