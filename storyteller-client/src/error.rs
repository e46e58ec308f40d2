//! Error types for the Storyteller client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Storyteller client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Human-readable message, taken from the `detail` field when present
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Message suitable for showing to an end user
    ///
    /// API errors yield the server's detail text verbatim; every other
    /// variant falls back to its display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if the server rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ApiError { status: 401 | 403, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_detail() {
        let err = ClientError::api_error(402, "quota exceeded");
        assert_eq!(err.user_message(), "quota exceeded");
        assert_eq!(err.to_string(), "API error (status 402): quota exceeded");
    }

    #[test]
    fn test_status_predicates() {
        assert!(ClientError::api_error(404, "x").is_not_found());
        assert!(ClientError::api_error(401, "x").is_unauthorized());
        assert!(ClientError::api_error(422, "x").is_client_error());
        assert!(ClientError::api_error(503, "x").is_server_error());
        assert!(!ClientError::ParseError("x".into()).is_client_error());
    }
}
