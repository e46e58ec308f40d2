//! Project command handlers
//!
//! Handles listing, viewing and saving projects.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use serde_json::Value as JsonValue;
use storyteller_client::ApiClient;
use storyteller_core::domain::project::Project;
use storyteller_studio::StudioConfig;
use tracing::debug;

use super::read_json_file;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List your projects
    List,
    /// Get project details
    Get {
        /// Project ID
        id: String,
    },
    /// Save a project from a JSON file
    Save {
        /// Path to the project JSON
        file: PathBuf,
    },
}

/// Handle project commands
pub async fn handle_project_command(command: ProjectCommands, config: &StudioConfig) -> Result<()> {
    let client = config.build_client()?;

    match command {
        ProjectCommands::List => list_projects(&client).await,
        ProjectCommands::Get { id } => get_project(&client, &id).await,
        ProjectCommands::Save { file } => {
            debug!("Saving project from {}", file.display());
            let payload: JsonValue = read_json_file(&file)?;
            let project = client.save_project(&payload).await?;
            println!("{} Saved project {}", "✓".green(), project.id.cyan());
            Ok(())
        }
    }
}

/// List all projects
async fn list_projects(client: &ApiClient) -> Result<()> {
    let projects = client.list_projects().await?;

    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
    } else {
        println!("{}", format!("Found {} project(s):", projects.len()).bold());
        println!();
        for project in projects {
            print_project_summary(&project);
        }
    }

    Ok(())
}

/// Get and display a single project
async fn get_project(client: &ApiClient, id: &str) -> Result<()> {
    let project = client.get_project(id).await?;
    print_project_details(&project);
    Ok(())
}

/// Print a project summary
fn print_project_summary(project: &Project) {
    println!("  {} {}", "▸".cyan(), project.display_title().bold());
    println!("    ID:     {}", project.id.dimmed());
    println!("    Scenes: {}", project.scene_count());
    println!();
}

/// Print detailed project information
fn print_project_details(project: &Project) {
    println!("{}", "Project Details:".bold());
    println!("  ID:          {}", project.id.cyan());
    println!("  Title:       {}", project.display_title());
    if let Some(description) = &project.description {
        println!("  Idea:        {}", description.dimmed());
    }

    if let Some(settings) = &project.settings {
        println!("\n{}", "Settings:".bold());
        println!("  Tone:     {}", settings.tone);
        println!("  Style:    {}", settings.style);
        println!("  Duration: {}s", settings.duration);
    }

    if let Some(script) = &project.script {
        println!("\n{}", "Script:".bold());
        if !script.intro.is_empty() {
            println!("  {}", script.intro.italic());
        }
        for scene in &script.scenes {
            let number = scene
                .scene_number
                .map_or_else(|| "?".to_string(), |n| n.to_string());
            println!("  {} Scene {}: {}", "▸".cyan(), number, scene.action);
            if !scene.dialogue.is_empty() {
                println!("    {} {}", "»".dimmed(), scene.dialogue);
            }
            if !scene.voice_over.is_empty() {
                println!("    {} {}", "Voiceover:".dimmed(), scene.voice_over.italic());
            }
        }
    }

    if !project.images.is_empty() {
        println!("\n{}", format!("Images: {}", project.images.len()).bold());
    }
}
