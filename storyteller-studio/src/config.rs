//! Studio configuration
//!
//! Defines all configurable parameters for the studio layer: where the
//! backend lives, how to authenticate and how aggressively to poll.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use storyteller_client::{ApiClient, StaticSession};

use crate::polling::PollerConfig;

/// Studio configuration
///
/// Polling knobs are configurable so slow render backends can be polled
/// less often without code changes.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Backend API base URL (e.g., "http://localhost:8000/api/v1")
    pub api_base_url: String,

    /// Bearer token of the current session, if signed in
    pub access_token: Option<String>,

    /// Delay before the first status probe and between probes
    pub poll_interval: Duration,

    /// Multiplier applied to the delay after every non-terminal probe
    pub poll_backoff: f64,

    /// Upper bound for the backed-off delay
    pub poll_max_interval: Duration,

    /// Consecutive failed status probes tolerated before a job is failed
    pub max_poll_failures: u32,

    /// Per-request timeout of the HTTP client
    pub request_timeout: Duration,
}

impl StudioConfig {
    pub const DEFAULT_API_BASE: &'static str = "http://localhost:8000/api/v1";

    /// Creates a new configuration with defaults
    pub fn new(api_base_url: String) -> Self {
        Self {
            api_base_url,
            access_token: None,
            poll_interval: Duration::from_millis(2000),
            poll_backoff: 1.0,
            poll_max_interval: Duration::from_secs(30),
            max_poll_failures: 1,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - STORYTELLER_API_BASE (optional, default: http://localhost:8000/api/v1)
    /// - STORYTELLER_TOKEN (optional)
    /// - STORYTELLER_POLL_INTERVAL_MS (optional, default: 2000)
    /// - STORYTELLER_POLL_BACKOFF (optional, default: 1.0)
    /// - STORYTELLER_POLL_MAX_INTERVAL_MS (optional, default: 30000)
    /// - STORYTELLER_MAX_POLL_FAILURES (optional, default: 1)
    /// - STORYTELLER_REQUEST_TIMEOUT_SECS (optional, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_base_url =
            lookup("STORYTELLER_API_BASE").unwrap_or_else(|| Self::DEFAULT_API_BASE.to_string());
        let mut config = Self::new(api_base_url);

        config.access_token = lookup("STORYTELLER_TOKEN").filter(|t| !t.is_empty());

        if let Some(raw) = lookup("STORYTELLER_POLL_INTERVAL_MS") {
            let ms: u64 = raw
                .parse()
                .with_context(|| format!("Invalid STORYTELLER_POLL_INTERVAL_MS '{}'", raw))?;
            config.poll_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("STORYTELLER_POLL_BACKOFF") {
            config.poll_backoff = raw
                .parse()
                .with_context(|| format!("Invalid STORYTELLER_POLL_BACKOFF '{}'", raw))?;
        }

        if let Some(raw) = lookup("STORYTELLER_POLL_MAX_INTERVAL_MS") {
            let ms: u64 = raw
                .parse()
                .with_context(|| format!("Invalid STORYTELLER_POLL_MAX_INTERVAL_MS '{}'", raw))?;
            config.poll_max_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("STORYTELLER_MAX_POLL_FAILURES") {
            config.max_poll_failures = raw
                .parse()
                .with_context(|| format!("Invalid STORYTELLER_MAX_POLL_FAILURES '{}'", raw))?;
        }

        if let Some(raw) = lookup("STORYTELLER_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("Invalid STORYTELLER_REQUEST_TIMEOUT_SECS '{}'", raw))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Sets the session token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the base polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_base_url.is_empty() {
            anyhow::bail!("api_base_url cannot be empty");
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            anyhow::bail!("api_base_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.poll_backoff.is_nan() || self.poll_backoff < 1.0 {
            anyhow::bail!("poll_backoff must be at least 1.0");
        }

        if self.poll_max_interval < self.poll_interval {
            anyhow::bail!("poll_max_interval must not be shorter than poll_interval");
        }

        if self.max_poll_failures == 0 {
            anyhow::bail!("max_poll_failures must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Polling settings for render tracking
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: self.poll_interval,
            backoff_factor: self.poll_backoff,
            max_interval: self.poll_max_interval,
        }
    }

    /// Builds an API client with the configured timeout and session
    pub fn build_client(&self) -> anyhow::Result<ApiClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let client = ApiClient::with_client(self.api_base_url.clone(), http);

        Ok(match &self.access_token {
            Some(token) => client.with_session(Arc::new(StaticSession::new(token.clone()))),
            None => client,
        })
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_API_BASE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.max_poll_failures, 1);
        assert!(config.access_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StudioConfig::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.api_base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
        config.api_base_url = "https://api.example.com/api/v1".to_string();
        assert!(config.validate().is_ok());

        config.poll_backoff = 0.5;
        assert!(config.validate().is_err());
        config.poll_backoff = 1.5;

        config.poll_max_interval = Duration::from_millis(100);
        assert!(config.validate().is_err());
        config.poll_max_interval = Duration::from_secs(60);

        config.max_poll_failures = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = StudioConfig::from_lookup(lookup_from(&[
            ("STORYTELLER_API_BASE", "https://api.example.com/api/v1"),
            ("STORYTELLER_TOKEN", "tok"),
            ("STORYTELLER_POLL_INTERVAL_MS", "500"),
            ("STORYTELLER_POLL_BACKOFF", "2"),
            ("STORYTELLER_MAX_POLL_FAILURES", "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.poll_backoff, 2.0);
        assert_eq!(config.max_poll_failures, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = StudioConfig::from_lookup(lookup_from(&[(
            "STORYTELLER_POLL_INTERVAL_MS",
            "soon",
        )]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_token_means_signed_out() {
        let config =
            StudioConfig::from_lookup(lookup_from(&[("STORYTELLER_TOKEN", "")])).unwrap();
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_poller_config_mirrors_settings() {
        let config = StudioConfig::default().with_poll_interval(Duration::from_millis(750));
        let poller = config.poller_config();
        assert_eq!(poller.interval, Duration::from_millis(750));
        assert_eq!(poller.backoff_factor, 1.0);
    }

    #[test]
    fn test_build_client_uses_base_url() {
        let client = StudioConfig::default().with_token("t").build_client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
    }
}
