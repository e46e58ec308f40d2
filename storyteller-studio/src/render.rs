//! Render job tracking
//!
//! [`RenderTracker`] drives one render job from submission to a terminal
//! state:
//!
//! ```text
//! pending ──submit ok──▶ processing ──status done───▶ done
//!    │                        │
//!    └──submit failed──▶ failed ◀──status failed / probe error
//! ```
//!
//! The job record is written only by [`RenderTracker::start_render`] and by
//! the status probe. Both take the same lock and compare a generation
//! number, so a response arriving after the tracker was disposed or
//! restarted is discarded instead of reviving stale state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value as JsonValue;
use storyteller_client::{ClientError, RenderApi};
use storyteller_core::domain::render::{JobStatus, RenderJob, RenderStatus};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::StudioConfig;
use crate::polling::{Poller, PollerConfig, Tick};

/// Message recorded when the backend reports a failure without details
const UNKNOWN_FAILURE: &str = "Render failed";

struct TrackerState {
    job: Option<RenderJob>,
    /// Bumped by every start and by disposal
    generation: u64,
    consecutive_failures: u32,
}

struct Shared {
    state: Mutex<TrackerState>,
    updates: watch::Sender<Option<RenderJob>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &TrackerState) {
        self.updates.send_replace(state.job.clone());
    }
}

/// Tracks a single render job and exposes its state to a UI layer
pub struct RenderTracker {
    api: Arc<dyn RenderApi>,
    poller: Poller,
    shared: Arc<Shared>,
    max_poll_failures: u32,
}

impl RenderTracker {
    /// Creates an idle tracker
    pub fn new(api: Arc<dyn RenderApi>, poller_config: PollerConfig) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            api,
            poller: Poller::new(poller_config),
            shared: Arc::new(Shared {
                state: Mutex::new(TrackerState {
                    job: None,
                    generation: 0,
                    consecutive_failures: 0,
                }),
                updates,
            }),
            max_poll_failures: 1,
        }
    }

    /// Creates a tracker using the polling settings of `config`
    pub fn from_config(api: Arc<dyn RenderApi>, config: &StudioConfig) -> Self {
        Self::new(api, config.poller_config()).with_max_poll_failures(config.max_poll_failures)
    }

    /// Number of consecutive failed status queries that fail the job
    pub fn with_max_poll_failures(mut self, max: u32) -> Self {
        self.max_poll_failures = max.max(1);
        self
    }

    /// Submits a render job and starts tracking it
    ///
    /// Any previous job is discarded first and a fresh record is published
    /// as `pending` while the submission is in flight. It moves to
    /// `processing` only once the backend accepted the job, so observers
    /// never see `processing` for a render that was rejected. If the
    /// submission fails the job is marked `failed` with the server's
    /// message, polling is not started and the error is returned as well.
    pub async fn start_render(&self, job_id: &str, settings: &JsonValue) -> Result<(), ClientError> {
        let generation = {
            let mut state = self.shared.lock();
            self.poller.stop();
            state.generation += 1;
            state.consecutive_failures = 0;
            state.job = Some(RenderJob::new(job_id));
            self.shared.publish(&state);
            state.generation
        };

        info!("Submitting render for job {}", job_id);
        let submitted = self.api.submit_render(job_id, settings).await;

        let mut state = self.shared.lock();
        if state.generation != generation {
            debug!("Render submission for job {} was superseded", job_id);
            return submitted;
        }

        let Some(job) = state.job.as_mut() else {
            return submitted;
        };

        match &submitted {
            Ok(()) => {
                job.status = JobStatus::Processing;
                // Poll first so a waiter seeing `processing` also sees an active poller
                self.start_polling(job_id, generation);
                self.shared.publish(&state);
            }
            Err(e) => {
                warn!("Render submission for job {} failed: {}", job_id, e);
                job.status = JobStatus::Failed;
                job.error_message = Some(e.user_message());
                self.shared.publish(&state);
            }
        }

        submitted
    }

    fn start_polling(&self, job_id: &str, generation: u64) {
        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let job_id = job_id.to_string();
        let max_failures = self.max_poll_failures;

        self.poller.start(move || {
            let api = Arc::clone(&api);
            let shared = Arc::clone(&shared);
            let job_id = job_id.clone();
            async move {
                let response = api.render_status(&job_id).await;
                apply_status(&shared, generation, max_failures, response)
            }
        });
    }

    /// Stops tracking; later responses are ignored
    ///
    /// The job record keeps its last state. Dropping the tracker has the
    /// same effect.
    pub fn dispose(&self) {
        let mut state = self.shared.lock();
        state.generation += 1;
        if self.poller.stop() {
            debug!("Render tracker disposed while polling");
        }
        // Wakes pending `wait_until_settled` calls
        self.shared.publish(&state);
    }

    /// Snapshot of the current job, if one was started
    pub fn job(&self) -> Option<RenderJob> {
        self.shared.lock().job.clone()
    }

    /// Current status; `pending` before any render was started
    pub fn status(&self) -> JobStatus {
        self.shared
            .lock()
            .job
            .as_ref()
            .map_or(JobStatus::Pending, |job| job.status)
    }

    pub fn result_url(&self) -> Option<String> {
        self.shared.lock().job.as_ref().and_then(|job| job.result_url.clone())
    }

    pub fn error_message(&self) -> Option<String> {
        self.shared
            .lock()
            .job
            .as_ref()
            .and_then(|job| job.error_message.clone())
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    /// Receiver notified on every change of the job record
    pub fn subscribe(&self) -> watch::Receiver<Option<RenderJob>> {
        self.shared.updates.subscribe()
    }

    /// Waits until the job reaches a terminal state or polling ends
    ///
    /// A submission still in flight is waited for. Returns early when the
    /// tracker is disposed or restarted, and immediately when no job was
    /// started.
    pub async fn wait_until_settled(&self) -> Option<RenderJob> {
        let generation = self.shared.lock().generation;
        let mut updates = self.subscribe();

        loop {
            let submitting = match &*updates.borrow_and_update() {
                None => break,
                Some(job) if job.is_terminal() => break,
                Some(job) => job.status == JobStatus::Pending,
            };
            if self.shared.lock().generation != generation {
                break;
            }
            if !submitting && !self.poller.is_polling() {
                break;
            }

            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = self.poller.wait(), if !submitting => {}
            }
        }

        self.job()
    }
}

impl Drop for RenderTracker {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Applies one status probe result to the shared job record
///
/// Returns an error after recording a failure, which makes the poller stop.
fn apply_status(
    shared: &Shared,
    generation: u64,
    max_failures: u32,
    response: Result<RenderStatus, ClientError>,
) -> anyhow::Result<Tick> {
    let mut state = shared.lock();
    if state.generation != generation {
        debug!("Discarding stale render status response");
        return Ok(Tick::Done);
    }

    let TrackerState {
        job,
        consecutive_failures,
        ..
    } = &mut *state;
    let Some(job) = job.as_mut() else {
        return Ok(Tick::Done);
    };
    if job.is_terminal() {
        return Ok(Tick::Done);
    }

    let report = match response {
        Ok(report) => {
            *consecutive_failures = 0;
            report
        }
        Err(e) => {
            *consecutive_failures += 1;
            if *consecutive_failures < max_failures {
                warn!(
                    "Render status check for job {} failed ({}/{}): {}",
                    job.job_id, consecutive_failures, max_failures, e
                );
                return Ok(Tick::Continue);
            }

            job.status = JobStatus::Failed;
            job.error_message = Some(format!("Failed to fetch render status: {}", e.user_message()));
            let job_id = job.job_id.clone();
            shared.publish(&state);
            return Err(anyhow::Error::new(e)
                .context(format!("Render status check for job {} failed", job_id)));
        }
    };

    let Some(status) = report.job_status() else {
        debug!(
            "Job {} reported unrecognized status '{}', still polling",
            job.job_id, report.status
        );
        return Ok(Tick::Continue);
    };

    job.status = status;
    let tick = match status {
        JobStatus::Done => {
            info!("Render of job {} finished", job.job_id);
            job.result_url = report.video_url;
            Tick::Done
        }
        JobStatus::Failed => {
            warn!("Render of job {} failed: {:?}", job.job_id, report.error);
            job.error_message = Some(report.error.unwrap_or_else(|| UNKNOWN_FAILURE.to_string()));
            Tick::Done
        }
        JobStatus::Pending | JobStatus::Processing => Tick::Continue,
    };

    shared.publish(&state);
    Ok(tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    const INTERVAL: Duration = Duration::from_millis(2000);

    /// Scripted backend: each status call pops the next response
    #[derive(Default)]
    struct FakeApi {
        submit_error: Mutex<Option<ClientError>>,
        statuses: Mutex<VecDeque<Result<RenderStatus, ClientError>>>,
        submitted: Mutex<Vec<(String, JsonValue)>>,
        status_calls: AtomicUsize,
        /// When set, status calls block until notified
        gate: Option<Arc<Notify>>,
        /// When set, submissions block until notified
        submit_gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn with_statuses(statuses: Vec<Result<RenderStatus, ClientError>>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                ..Default::default()
            }
        }

        fn status_calls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderApi for FakeApi {
        async fn submit_render(&self, job_id: &str, settings: &JsonValue) -> Result<(), ClientError> {
            self.submitted
                .lock()
                .unwrap()
                .push((job_id.to_string(), settings.clone()));
            if let Some(gate) = &self.submit_gate {
                gate.notified().await;
            }
            match self.submit_error.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn render_status(&self, _job_id: &str) -> Result<RenderStatus, ClientError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(status("processing", None, None)))
        }
    }

    fn status(state: &str, video_url: Option<&str>, error: Option<&str>) -> RenderStatus {
        RenderStatus {
            status: state.to_string(),
            video_url: video_url.map(str::to_string),
            error: error.map(str::to_string),
        }
    }

    fn tracker(api: &Arc<FakeApi>) -> RenderTracker {
        RenderTracker::new(api.clone(), PollerConfig::fixed(INTERVAL))
    }

    async fn advance(ticks: u32) {
        tokio::time::sleep(INTERVAL * ticks + Duration::from_millis(100)).await;
    }

    #[tokio::test]
    async fn test_idle_tracker_is_pending() {
        let api = Arc::new(FakeApi::default());
        let tracker = tracker(&api);

        assert_eq!(tracker.status(), JobStatus::Pending);
        assert!(tracker.job().is_none());
        assert!(!tracker.is_polling());
        assert!(tracker.wait_until_settled().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_render_records_video_url() {
        let api = Arc::new(FakeApi::with_statuses(vec![
            Ok(status("processing", None, None)),
            Ok(status("done", Some("https://x/y.mp4"), None)),
        ]));
        let tracker = tracker(&api);

        tracker
            .start_render("job-1", &json!({"quality": "hd"}))
            .await
            .unwrap();
        assert_eq!(tracker.status(), JobStatus::Processing);
        assert!(tracker.is_polling());

        let job = tracker.wait_until_settled().await.unwrap();
        assert_eq!(
            job,
            RenderJob {
                job_id: "job-1".to_string(),
                status: JobStatus::Done,
                result_url: Some("https://x/y.mp4".to_string()),
                error_message: None,
            }
        );

        advance(1).await;
        assert!(!tracker.is_polling());
        assert_eq!(api.status_calls(), 2);
        assert_eq!(
            api.submitted.lock().unwrap()[0],
            ("job-1".to_string(), json!({"quality": "hd"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_submission_never_polls() {
        let api = Arc::new(FakeApi::default());
        *api.submit_error.lock().unwrap() = Some(ClientError::api_error(402, "quota exceeded"));
        let tracker = tracker(&api);

        let err = tracker
            .start_render("job-2", &json!({}))
            .await
            .expect_err("submission should fail");
        assert_eq!(err.user_message(), "quota exceeded");

        assert_eq!(tracker.status(), JobStatus::Failed);
        assert_eq!(tracker.error_message().as_deref(), Some("quota exceeded"));
        assert!(!tracker.is_polling());

        advance(3).await;
        assert_eq!(api.status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reported_failure_records_error() {
        let api = Arc::new(FakeApi::with_statuses(vec![Ok(status(
            "failed",
            None,
            Some("render crashed"),
        ))]));
        let tracker = tracker(&api);

        tracker.start_render("job-3", &json!({})).await.unwrap();
        let job = tracker.wait_until_settled().await.unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("render crashed"));
        assert!(job.result_url.is_none());

        advance(2).await;
        assert!(!tracker.is_polling());
        assert_eq!(api.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_without_message_gets_default() {
        let api = Arc::new(FakeApi::with_statuses(vec![Ok(status("failed", None, None))]));
        let tracker = tracker(&api);

        tracker.start_render("job-4", &json!({})).await.unwrap();
        let job = tracker.wait_until_settled().await.unwrap();

        assert_eq!(job.error_message.as_deref(), Some(UNKNOWN_FAILURE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_terminal_statuses_keep_polling() {
        let mut statuses = vec![Ok(status("queued", None, None))];
        statuses.extend((0..20).map(|_| Ok(status("processing", None, None))));
        let api = Arc::new(FakeApi::with_statuses(statuses));
        let tracker = tracker(&api);

        tracker.start_render("job-5", &json!({})).await.unwrap();
        advance(30).await;

        assert!(tracker.is_polling());
        assert_eq!(tracker.status(), JobStatus::Processing);
        assert_eq!(api.status_calls(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_marks_job_failed() {
        let api = Arc::new(FakeApi::with_statuses(vec![
            Ok(status("processing", None, None)),
            Err(ClientError::api_error(503, "backend restarting")),
        ]));
        let tracker = tracker(&api);

        tracker.start_render("job-6", &json!({})).await.unwrap();
        let job = tracker.wait_until_settled().await.unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error_message.as_deref(),
            Some("Failed to fetch render status: backend restarting")
        );
        advance(1).await;
        assert!(!tracker.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_poll_errors_are_tolerated() {
        let api = Arc::new(FakeApi::with_statuses(vec![
            Err(ClientError::api_error(502, "bad gateway")),
            Err(ClientError::api_error(502, "bad gateway")),
            Ok(status("done", Some("https://x/z.mp4"), None)),
        ]));
        let tracker = tracker(&api).with_max_poll_failures(3);

        tracker.start_render("job-7", &json!({})).await.unwrap();
        let job = tracker.wait_until_settled().await.unwrap();

        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.result_url.as_deref(), Some("https://x/z.mp4"));
        assert!(job.error_message.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_discards_in_flight_response() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            statuses: Mutex::new(vec![Ok(status("done", Some("https://late/video.mp4"), None))].into()),
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let tracker = tracker(&api);
        let mut updates = tracker.subscribe();

        tracker.start_render("job-8", &json!({})).await.unwrap();
        advance(1).await;
        assert_eq!(api.status_calls(), 1);

        tracker.dispose();
        assert!(!tracker.is_polling());
        updates.borrow_and_update();

        // The response the probe was waiting for arrives after disposal
        gate.notify_waiters();
        advance(3).await;

        assert!(!updates.has_changed().unwrap());
        assert_eq!(tracker.status(), JobStatus::Processing);
        assert!(tracker.result_url().is_none());
        assert_eq!(api.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_cannot_overwrite_new_job() {
        let api = Arc::new(FakeApi::default());
        let tracker = tracker(&api);
        let shared = Arc::clone(&tracker.shared);

        tracker.start_render("old", &json!({})).await.unwrap();
        let old_generation = shared.lock().generation;
        tracker.start_render("new", &json!({})).await.unwrap();

        let tick = apply_status(
            &shared,
            old_generation,
            1,
            Ok(status("done", Some("https://old.mp4"), None)),
        )
        .unwrap();

        assert_eq!(tick, Tick::Done);
        let job = tracker.job().unwrap();
        assert_eq!(job.job_id, "new");
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.result_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_previous_outcome() {
        let api = Arc::new(FakeApi::with_statuses(vec![
            Ok(status("failed", None, Some("out of memory"))),
            Ok(status("done", Some("https://x/retry.mp4"), None)),
        ]));
        let tracker = tracker(&api);

        tracker.start_render("job-9", &json!({})).await.unwrap();
        let first = tracker.wait_until_settled().await.unwrap();
        assert_eq!(first.status, JobStatus::Failed);

        tracker.start_render("job-9", &json!({})).await.unwrap();
        assert_eq!(tracker.status(), JobStatus::Processing);
        assert!(tracker.error_message().is_none());

        let second = tracker.wait_until_settled().await.unwrap();
        assert_eq!(second.status, JobStatus::Done);
        assert!(second.error_message.is_none());
        assert_eq!(second.result_url.as_deref(), Some("https://x/retry.mp4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let api = Arc::new(FakeApi::default());
        let tracker = tracker(&api);

        tracker.start_render("job-10", &json!({})).await.unwrap();
        advance(2).await;
        drop(tracker);
        advance(5).await;

        assert_eq!(api.status_calls(), 2);
    }

    fn gated_submission(
        statuses: Vec<Result<RenderStatus, ClientError>>,
    ) -> (Arc<RenderTracker>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            statuses: Mutex::new(statuses.into()),
            submit_gate: Some(gate.clone()),
            ..Default::default()
        });
        (Arc::new(tracker(&api)), gate)
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_covers_submission_in_flight() {
        let (tracker, gate) =
            gated_submission(vec![Ok(status("done", Some("https://x/slow.mp4"), None))]);

        let submission = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.start_render("job-12", &json!({})).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(tracker.status(), JobStatus::Pending);

        let waiter = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.wait_until_settled().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        gate.notify_one();
        submission.await.unwrap().unwrap();

        let job = waiter.await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.result_url.as_deref(), Some("https://x/slow.mp4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_releases_wait_during_submission() {
        let (tracker, _gate) = gated_submission(vec![]);

        let _submission = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.start_render("job-13", &json!({})).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let waiter = tokio::spawn({
            let tracker = Arc::clone(&tracker);
            async move { tracker.wait_until_settled().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        tracker.dispose();
        let job = waiter.await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!tracker.is_polling());
    }
}
