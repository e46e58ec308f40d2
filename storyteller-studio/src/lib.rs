//! Storyteller Studio
//!
//! Client-side application state for the Storyteller product.
//!
//! Architecture:
//! - Configuration: settings loaded from the environment or defaults
//! - Polling: a cancellable repeat-until-done loop with backoff
//! - Render tracking: drives one render job to a terminal state
//! - Voiceover: tracks an in-flight narration request
//! - UI state: notifications and confirm dialogs as explicit context objects
//!
//! Every stateful type here exposes its state through a
//! [`tokio::sync::watch`] channel so a UI layer can react to changes.

pub mod config;
pub mod confirm;
pub mod notification;
pub mod polling;
pub mod render;
pub mod voiceover;

pub use config::StudioConfig;
pub use confirm::{ConfirmDialog, ConfirmOutcome, DialogState};
pub use notification::{Notification, NotificationKind, Notifier};
pub use polling::{Poller, PollerConfig, Tick};
pub use render::RenderTracker;
pub use voiceover::{VoiceoverSession, VoiceoverState};
