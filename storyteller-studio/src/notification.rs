//! Application-wide notifications
//!
//! A [`Notifier`] is created once at startup and handed to every consumer
//! that needs to show or observe toast messages. Clones share one state.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Error,
    Success,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub visible: bool,
    pub message: String,
    pub kind: NotificationKind,
}

/// Shared handle to the current notification
#[derive(Clone)]
pub struct Notifier {
    state: Arc<watch::Sender<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Notification::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Shows `message`, replacing whatever was shown before
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        debug!(%kind, "Showing notification: {}", message);
        self.state.send_replace(Notification {
            visible: true,
            message,
            kind,
        });
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    pub fn show_success(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn show_info(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Info);
    }

    /// Hides the notification; the last message is kept
    pub fn close(&self) {
        self.state.send_if_modified(|n| std::mem::replace(&mut n.visible, false));
    }

    pub fn current(&self) -> Notification {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Notification> {
        self.state.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
