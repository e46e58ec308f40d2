//! Render job domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a render job as seen by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    /// Returns true for states that never transition again on their own
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the known states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown render status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Client-side record of a single render attempt
///
/// Owned by the render tracker. A fresh record is created every time a
/// render is started, so `result_url` and `error_message` never leak from a
/// previous attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderJob {
    pub job_id: String,
    pub status: JobStatus,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
}

impl RenderJob {
    /// Creates a job record in the initial `pending` state
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Pending,
            result_url: None,
            error_message: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Response of the render status endpoint
///
/// `status` is kept as a raw string: the backend may report states this
/// client does not know about, and those must not break polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderStatus {
    /// Parses the reported status, returning `None` for unrecognized values
    pub fn job_status(&self) -> Option<JobStatus> {
        self.status.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = RenderJob::new("job-1");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result_url.is_none());
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_render_status_with_unknown_state() {
        let status: RenderStatus = serde_json::from_str(r#"{"status":"queued"}"#).unwrap();
        assert_eq!(status.job_status(), None);
        assert!(status.video_url.is_none());
    }

    #[test]
    fn test_render_status_done() {
        let status: RenderStatus =
            serde_json::from_str(r#"{"status":"done","video_url":"https://x/y.mp4"}"#).unwrap();
        assert_eq!(status.job_status(), Some(JobStatus::Done));
        assert_eq!(status.video_url.as_deref(), Some("https://x/y.mp4"));
    }
}
