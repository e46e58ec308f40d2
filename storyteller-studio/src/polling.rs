//! Polling primitive
//!
//! A [`Poller`] runs an async probe on a cadence until the probe reports
//! [`Tick::Done`], the probe fails, or the poller is stopped. Probes run
//! sequentially inside a single spawned task, so two invocations can never
//! overlap. Stopping aborts that task, and dropping the poller stops it.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What a probe wants the poller to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule another probe
    Continue,
    /// The condition was reached, stop polling
    Done,
}

/// Cadence of a [`Poller`]
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Delay before the first probe and between probes
    pub interval: Duration,
    /// Multiplier applied to the delay after each `Tick::Continue`;
    /// `1.0` keeps a fixed cadence
    pub backoff_factor: f64,
    /// Upper bound for the backed-off delay
    pub max_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(30),
        }
    }
}

impl PollerConfig {
    /// Fixed cadence without backoff
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff_factor: 1.0,
            max_interval: interval,
        }
    }

    /// Delay to use after a non-terminal probe that followed `current`
    pub fn next_delay(&self, current: Duration) -> Duration {
        if self.backoff_factor.is_nan() || self.backoff_factor <= 1.0 {
            return current;
        }

        let cap = self.max_interval.max(self.interval);
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map_or(cap, |next| next.min(cap))
    }
}

#[derive(Default)]
struct PollingHandle {
    /// Live polling task; `None` whenever the poller is inactive
    task: Option<JoinHandle<()>>,
    /// Bumped on every start so a finished task never clears a newer one
    generation: u64,
}

struct Shared {
    handle: Mutex<PollingHandle>,
    active: watch::Sender<bool>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PollingHandle> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Repeatedly invokes a probe until told to stop
pub struct Poller {
    config: PollerConfig,
    shared: Arc<Shared>,
}

impl Poller {
    /// Creates an inactive poller
    pub fn new(config: PollerConfig) -> Self {
        let (active, _) = watch::channel(false);
        Self {
            config,
            shared: Arc::new(Shared {
                handle: Mutex::new(PollingHandle::default()),
                active,
            }),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Starts polling with `probe`
    ///
    /// Returns `false` without doing anything if the poller is already
    /// active. Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&self, mut probe: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<Tick>> + Send + 'static,
    {
        let mut handle = self.shared.lock();
        if handle.task.is_some() {
            debug!("Poller already active, ignoring start");
            return false;
        }

        handle.generation += 1;
        let generation = handle.generation;
        let config = self.config.clone();
        let shared = Arc::clone(&self.shared);

        debug!("Starting poller (interval: {:?})", config.interval);

        handle.task = Some(tokio::spawn(async move {
            let mut delay = config.interval;

            loop {
                tokio::time::sleep(delay).await;

                match probe().await {
                    Ok(Tick::Continue) => delay = config.next_delay(delay),
                    Ok(Tick::Done) => {
                        debug!("Poll condition reached");
                        break;
                    }
                    Err(e) => {
                        warn!("Polling probe failed, stopping: {:#}", e);
                        break;
                    }
                }
            }

            let mut handle = shared.lock();
            if handle.generation == generation {
                handle.task = None;
                shared.active.send_replace(false);
            }
        }));
        self.shared.active.send_replace(true);

        true
    }

    /// Stops polling
    ///
    /// An in-flight probe is cancelled at its next suspension point.
    /// Returns `false` if the poller was not active.
    pub fn stop(&self) -> bool {
        let mut handle = self.shared.lock();
        match handle.task.take() {
            Some(task) => {
                task.abort();
                self.shared.active.send_replace(false);
                debug!("Poller stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock().task.is_some()
    }

    /// Waits until the poller is inactive, whatever the reason
    pub async fn wait(&self) {
        let mut active = self.shared.active.subscribe();
        // The sender lives in `self.shared`, so the channel cannot close here.
        let _ = active.wait_for(|active| !*active).await;
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
