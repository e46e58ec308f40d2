//! Storyteller CLI
//!
//! Command-line interface for the Storyteller backend: generate scripts and
//! images, manage projects, and render videos while tracking their progress.

mod commands;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use storyteller_studio::StudioConfig;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "storyteller=warn,storyteller_client=warn,storyteller_studio=info";

#[derive(Parser)]
#[command(name = "storyteller")]
#[command(about = "Storyteller AI script and video CLI", long_about = None)]
struct Cli {
    /// Backend API base URL
    #[arg(
        long,
        env = "STORYTELLER_API_BASE",
        default_value = StudioConfig::DEFAULT_API_BASE
    )]
    api_base: String,

    /// Access token of the current session
    #[arg(long, env = "STORYTELLER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Delay between render status checks, in milliseconds
    #[arg(long, env = "STORYTELLER_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Multiplier applied to the delay after each status check
    #[arg(long, env = "STORYTELLER_POLL_BACKOFF", default_value_t = 1.0)]
    poll_backoff: f64,

    /// Upper bound for the backed-off delay, in milliseconds
    #[arg(long, env = "STORYTELLER_POLL_MAX_INTERVAL_MS", default_value_t = 30000)]
    poll_max_interval_ms: u64,

    /// Failed status checks tolerated before a render counts as failed
    #[arg(long, env = "STORYTELLER_MAX_POLL_FAILURES", default_value_t = 1)]
    max_poll_failures: u32,

    /// HTTP request timeout, in seconds
    #[arg(long, env = "STORYTELLER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Result<StudioConfig> {
        let mut config = StudioConfig::new(self.api_base.clone())
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms));

        config.access_token = self.token.clone().filter(|t| !t.is_empty());
        config.poll_backoff = self.poll_backoff;
        config.poll_max_interval =
            Duration::from_millis(self.poll_max_interval_ms).max(config.poll_interval);
        config.max_poll_failures = self.max_poll_failures;
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    debug!("Using API at {}", config.api_base_url);

    handle_command(cli.command, &config).await
}
