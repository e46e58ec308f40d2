//! Render command handlers
//!
//! Starts video renders and follows them until the backend reports a final
//! state.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use serde_json::Value as JsonValue;
use storyteller_client::ApiClient;
use storyteller_core::domain::render::{JobStatus, RenderJob};
use storyteller_studio::{ConfirmDialog, Notifier, RenderTracker, StudioConfig};
use tracing::{debug, info};

use super::print_notification;

/// Render subcommands
#[derive(Subcommand)]
pub enum RenderCommands {
    /// Start rendering a project's video
    Start {
        /// Project ID
        project_id: String,

        /// Render settings as a JSON object
        #[arg(long, default_value = "{}")]
        settings: String,

        /// Follow the render until it finishes
        #[arg(long, short)]
        follow: bool,

        /// Do not ask before replacing a finished video
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the render status of a project
    Status {
        /// Project ID
        project_id: String,
    },
}

/// Handle render commands
pub async fn handle_render_command(command: RenderCommands, config: &StudioConfig) -> Result<()> {
    let client = Arc::new(config.build_client()?);

    match command {
        RenderCommands::Start {
            project_id,
            settings,
            follow,
            yes,
        } => {
            let settings: JsonValue =
                serde_json::from_str(&settings).context("Invalid render settings JSON")?;
            if !settings.is_object() {
                bail!("Render settings must be a JSON object");
            }

            if !yes && already_rendered(&client, &project_id).await && !confirm_rerender().await? {
                println!("{}", "Render cancelled.".yellow());
                return Ok(());
            }

            start_render(client, config, &project_id, &settings, follow).await
        }
        RenderCommands::Status { project_id } => show_status(&client, &project_id).await,
    }
}

/// Whether the project already has a finished video
async fn already_rendered(client: &ApiClient, project_id: &str) -> bool {
    // A missing or unreadable status just means there is nothing to replace
    match client.get_render_status(project_id).await {
        Ok(status) => status.job_status() == Some(JobStatus::Done),
        Err(e) => {
            debug!("No render status for project {}: {}", project_id, e);
            false
        }
    }
}

/// Ask on stdin whether a finished video should be replaced
async fn confirm_rerender() -> Result<bool> {
    let dialog = ConfirmDialog::new();
    let answer = dialog.confirm(
        "Re-render video",
        "This project already has a finished video. Render it again?",
    );

    let state = dialog.state();
    println!("{}", state.title.bold());
    print!("{} [y/N] ", state.message);
    io::stdout().flush()?;

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|_| line)
    })
    .await??;

    let accepted = matches!(line.trim().to_lowercase().as_str(), "y" | "yes");
    debug!("Re-render confirmation answered: {}", accepted);
    if accepted {
        dialog.handle_confirm();
    } else {
        dialog.handle_cancel();
    }

    Ok(answer.await.is_confirmed())
}

/// Submit a render and optionally follow it to completion
async fn start_render(
    client: Arc<ApiClient>,
    config: &StudioConfig,
    project_id: &str,
    settings: &JsonValue,
    follow: bool,
) -> Result<()> {
    let notifier = Notifier::new();
    let tracker = RenderTracker::from_config(client, config);
    info!("Starting render for project {} (follow: {})", project_id, follow);

    if let Err(e) = tracker.start_render(project_id, settings).await {
        notifier.show_error(e.user_message());
        print_notification(&notifier.current());
        bail!("Render of project {} could not be started", project_id);
    }

    if !follow {
        notifier.show_info(format!("Render started for project {}", project_id));
        print_notification(&notifier.current());
        println!(
            "{}",
            format!("Check progress with: storyteller render status {}", project_id).dimmed()
        );
        return Ok(());
    }

    notifier.show_info("Rendering started");
    print_notification(&notifier.current());

    let mut updates = tracker.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = None;
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().as_ref().map(|job| job.status);
            if status != last {
                if let Some(status) = status {
                    println!("  {} {}", "▸".cyan(), colorize_status(status));
                }
                last = status;
            }
        }
    });

    let job = tracker.wait_until_settled().await;
    printer.abort();
    report_outcome(&notifier, job.as_ref())
}

/// Show the final state of a followed render
fn report_outcome(notifier: &Notifier, job: Option<&RenderJob>) -> Result<()> {
    match job {
        Some(job) if job.status == JobStatus::Done => {
            let url = job.result_url.as_deref().unwrap_or("(no URL returned)");
            notifier.show_success(format!("Video ready: {}", url));
            print_notification(&notifier.current());
            Ok(())
        }
        Some(job) if job.status == JobStatus::Failed => {
            let message = job.error_message.as_deref().unwrap_or("Render failed");
            notifier.show_error(message);
            print_notification(&notifier.current());
            bail!("Render of project {} failed", job.job_id)
        }
        _ => bail!("Render tracking stopped before the job finished"),
    }
}

/// Query and print the current render status
async fn show_status(client: &ApiClient, project_id: &str) -> Result<()> {
    let status = client.get_render_status(project_id).await?;

    let shown = match status.job_status() {
        Some(known) => colorize_status(known),
        None => status.status.yellow(),
    };

    println!("{}", "Render Status:".bold());
    println!("  Project: {}", project_id.cyan());
    println!("  Status:  {}", shown);
    if let Some(url) = &status.video_url {
        println!("  Video:   {}", url.green());
    }
    if let Some(error) = &status.error {
        println!("  Error:   {}", error.red());
    }

    Ok(())
}

/// Colorize a job status for terminal output
fn colorize_status(status: JobStatus) -> ColoredString {
    match status {
        JobStatus::Pending => "pending".yellow(),
        JobStatus::Processing => "processing".cyan(),
        JobStatus::Done => "done".green(),
        JobStatus::Failed => "failed".red(),
    }
}
