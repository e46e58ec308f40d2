//! Session providers
//!
//! The client never performs authentication itself. Before every request it
//! asks a [`SessionProvider`] for the current access token and, if one is
//! available, sends it as a bearer token. Without a session the request goes
//! out unauthenticated and the server decides what to do with it.

use async_trait::async_trait;

/// Source of access tokens for outgoing requests
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the current access token, or `None` when signed out
    async fn access_token(&self) -> Option<String>;
}

/// Provider for anonymous usage
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

#[async_trait]
impl SessionProvider for NoSession {
    async fn access_token(&self) -> Option<String> {
        None
    }
}

/// Provider holding a fixed token, e.g. one passed on the command line
#[derive(Debug, Clone)]
pub struct StaticSession {
    token: String,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn access_token(&self) -> Option<String> {
        if self.token.is_empty() {
            None
        } else {
            Some(self.token.clone())
        }
    }
}
