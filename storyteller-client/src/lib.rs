//! Storyteller HTTP Client
//!
//! A small, type-safe HTTP client for the Storyteller backend API.
//!
//! The client applies the configured base URL, injects the bearer token of
//! the current session and normalizes error responses so that callers get
//! the server's human-readable `detail` message.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storyteller_client::{ApiClient, StaticSession};
//! use storyteller_core::dto::script::ScriptOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:8000/api/v1")
//!         .with_session(Arc::new(StaticSession::new("token")));
//!
//!     let script = client
//!         .generate_script("a fox lost in the city", ScriptOptions::default())
//!         .await?;
//!
//!     println!("Generated '{}' with {} scenes", script.title, script.scenes.len());
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod generation;
mod projects;
mod render;
pub mod session;

pub use api::{RenderApi, VoiceoverApi};
pub use error::{ClientError, Result};
pub use session::{NoSession, SessionProvider, StaticSession};

use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

/// HTTP client for the Storyteller backend API
///
/// Endpoints are organized into groups:
/// - Generation (scripts, scene images)
/// - Projects and voiceovers
/// - Video rendering (submission and status)
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL of the API (e.g., "http://localhost:8000/api/v1")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Source of the bearer token
    session: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client without a session
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:8000/api/v1")
    ///
    /// # Example
    /// ```
    /// use storyteller_client::ApiClient;
    ///
    /// let client = ApiClient::new("http://localhost:8000/api/v1");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use storyteller_client::ApiClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ApiClient::with_client("http://localhost:8000/api/v1", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session: Arc::new(NoSession),
        }
    }

    /// Attach a session provider used for bearer-token injection
    pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = session;
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Building
    // =============================================================================

    /// Start a request to `path`, injecting the bearer token when signed in
    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);

        match self.session.access_token().await {
            Some(token) => builder.bearer_auth(token),
            None => {
                debug!("No active session, sending unauthenticated request to {}", url);
                builder
            }
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// `fallback` is the error message used when the server does not provide
    /// a `detail` field.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(error_from_response(response, fallback).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored
    async fn handle_empty_response(&self, response: reqwest::Response, fallback: &str) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            return Err(error_from_response(response, fallback).await);
        }

        Ok(())
    }
}

/// Validate an identifier before interpolating it into a path
fn path_segment<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    if id.is_empty() || id.contains('/') {
        return Err(ClientError::InvalidRequest(format!("invalid {} id '{}'", kind, id)));
    }
    Ok(id)
}

/// Turn a non-2xx response into an [`ClientError::ApiError`]
async fn error_from_response(response: reqwest::Response, fallback: &str) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    debug!(status, body = %body, "API request failed");

    let message = extract_detail(&body).unwrap_or_else(|| fallback.to_string());
    ClientError::api_error(status, message)
}

/// Pull the human-readable message out of an error body
///
/// Handles both `{"detail": "..."}` and validation errors shaped as
/// `{"detail": [{"msg": "..."}, ...]}`.
fn extract_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: JsonValue,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    match parsed.detail {
        JsonValue::String(detail) if !detail.trim().is_empty() => Some(detail),
        JsonValue::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(JsonValue::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
