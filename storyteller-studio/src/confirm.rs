//! Confirmation dialogs
//!
//! [`ConfirmDialog`] holds at most one pending confirmation. Opening a new
//! one resolves the previous request with [`ConfirmOutcome::Superseded`], so
//! a caller is never left waiting on a dialog that is no longer shown.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{oneshot, watch};
use tracing::debug;

/// How a confirmation request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    Cancelled,
    /// Another confirmation was opened before this one was answered
    Superseded,
}

impl ConfirmOutcome {
    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

/// What the dialog currently displays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    pub open: bool,
    pub title: String,
    pub message: String,
}

pub struct ConfirmDialog {
    pending: Mutex<Option<oneshot::Sender<ConfirmOutcome>>>,
    state: watch::Sender<DialogState>,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        let (state, _) = watch::channel(DialogState::default());
        Self {
            pending: Mutex::new(None),
            state,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<oneshot::Sender<ConfirmOutcome>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the dialog and returns a future resolving to the user's answer
    ///
    /// The dialog is opened immediately, not when the future is first
    /// polled. If the dialog is dropped unanswered the future resolves to
    /// [`ConfirmOutcome::Cancelled`].
    pub fn confirm(
        &self,
        title: &str,
        message: &str,
    ) -> impl Future<Output = ConfirmOutcome> + Send + use<> {
        let (tx, rx) = oneshot::channel();

        {
            let mut pending = self.lock();
            if let Some(previous) = pending.replace(tx) {
                debug!("Superseding unanswered confirmation");
                let _ = previous.send(ConfirmOutcome::Superseded);
            }

            self.state.send_replace(DialogState {
                open: true,
                title: title.to_string(),
                message: message.to_string(),
            });
        }

        async move { rx.await.unwrap_or(ConfirmOutcome::Cancelled) }
    }

    /// Answers the pending confirmation with yes
    pub fn handle_confirm(&self) -> bool {
        self.resolve(ConfirmOutcome::Confirmed)
    }

    /// Answers the pending confirmation with no
    pub fn handle_cancel(&self) -> bool {
        self.resolve(ConfirmOutcome::Cancelled)
    }

    /// Closes the dialog; returns false when nothing was pending
    fn resolve(&self, outcome: ConfirmOutcome) -> bool {
        let mut pending = self.lock();
        self.state.send_if_modified(|state| std::mem::replace(&mut state.open, false));

        match pending.take() {
            // The receiver may be gone if the caller stopped waiting
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    pub fn state(&self) -> DialogState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DialogState> {
        self.state.subscribe()
    }
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self::new()
    }
}
