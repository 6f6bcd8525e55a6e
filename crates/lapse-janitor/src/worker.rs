//! Background scheduler for continuous Janitor operation

use crate::{Janitor, JanitorError, MetricsSnapshot};
use lapse_domain::{BlobStore, MetadataStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Sweep timer shared by every worker. Holding the lock while waiting means
/// each tick wakes exactly one worker.
type SharedTicker = Arc<Mutex<Interval>>;

/// Lifecycle of a [`JanitorWorker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet started
    Uninitialized,
    /// Started with a zero TTL: no timer, no workers
    Disabled,
    /// Timer armed and worker tasks running
    Running,
    /// Stopped; terminal
    Stopped,
}

/// Background scheduler that runs sweep cycles on a fixed interval
///
/// `start` spawns `workers` tokio tasks that share one interval timer and one
/// cancellation token. A tick is consumed by exactly one worker; cancellation
/// reaches all of them. Sweep cycles on different workers may overlap.
///
/// # Examples
///
/// ```no_run
/// use lapse_janitor::{Janitor, JanitorConfig, JanitorWorker};
/// use lapse_store::{MemoryBlobStore, MemoryMetadataStore};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let janitor = Janitor::new(
///         JanitorConfig::default(),
///         &Duration::from_secs(7 * 24 * 3600),
///         Arc::new(MemoryBlobStore::new()),
///         Arc::new(MemoryMetadataStore::new()),
///     )?;
///     let mut worker = JanitorWorker::new(janitor);
///
///     worker.start()?;
///     tokio::signal::ctrl_c().await?;
///     worker.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker<B, M> {
    janitor: Arc<Janitor<B, M>>,
    state: WorkerState,
    cancel: CancellationToken,
    ticker: Option<SharedTicker>,
    handles: Vec<JoinHandle<()>>,
}

impl<B, M> JanitorWorker<B, M>
where
    B: BlobStore + 'static,
    M: MetadataStore + 'static,
{
    /// Wrap a janitor in a scheduler. Nothing runs until [`start`](Self::start).
    pub fn new(janitor: Janitor<B, M>) -> Self {
        Self {
            janitor: Arc::new(janitor),
            state: WorkerState::Uninitialized,
            cancel: CancellationToken::new(),
            ticker: None,
            handles: Vec::new(),
        }
    }

    /// The janitor driven by this scheduler
    pub fn janitor(&self) -> &Arc<Janitor<B, M>> {
        &self.janitor
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Number of worker tasks that have not yet exited
    pub fn active_workers(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Snapshot of the janitor's metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.janitor.metrics().snapshot()
    }

    /// Arm the timer and spawn the worker pool
    ///
    /// With a zero TTL this moves to [`WorkerState::Disabled`] without
    /// creating a timer or spawning anything.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), JanitorError> {
        if self.state != WorkerState::Uninitialized {
            return Err(JanitorError::AlreadyStarted);
        }

        if self.janitor.is_disabled() {
            tracing::info!("Configured TTL was 0; disabling janitor");
            self.state = WorkerState::Disabled;
            return Ok(());
        }

        let config = self.janitor.config();
        let period = config.sweep_interval();
        let workers = config.workers;

        // First sweep one full interval after start, not immediately
        let first_tick = Instant::now().checked_add(period).ok_or_else(|| {
            JanitorError::Config(format!("sweep interval {:?} is out of range", period))
        })?;
        let mut interval = interval_at(first_tick, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ticker: SharedTicker = Arc::new(Mutex::new(interval));

        for worker_id in 0..workers {
            let handle = tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&self.janitor),
                Arc::clone(&ticker),
                self.cancel.clone(),
            ));
            self.handles.push(handle);
        }

        self.ticker = Some(ticker);
        self.state = WorkerState::Running;

        tracing::info!(
            "Janitor started (ttl: {:?}, interval: {:?}, workers: {})",
            self.janitor.ttl(),
            period,
            workers
        );
        Ok(())
    }

    /// Signal every worker to exit
    ///
    /// Returns immediately. Workers notice at their next wait point, so a
    /// sweep cycle already in progress runs to completion. The timer is
    /// shared with the workers and is dropped once the last one has
    /// returned. Calling this when not running is a no-op apart from moving
    /// to [`WorkerState::Stopped`].
    pub fn stop(&mut self) {
        match self.state {
            WorkerState::Running => {
                self.cancel.cancel();
                self.ticker = None;
                tracing::info!("Janitor stopping");
            }
            WorkerState::Stopped => {
                tracing::debug!("Janitor already stopped");
            }
            WorkerState::Uninitialized | WorkerState::Disabled => {
                tracing::debug!("Janitor stop requested while not running");
            }
        }
        self.state = WorkerState::Stopped;
    }

    /// Stop, then wait for every worker task to finish
    pub async fn shutdown(&mut self) -> Result<(), JanitorError> {
        self.stop();

        let mut failures = Vec::new();
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                failures.push(e.to_string());
            }
        }

        tracing::info!(
            "Janitor stopped. Final metrics:\n{}",
            self.janitor.metrics().snapshot().summary()
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(JanitorError::Worker(failures.join("; ")))
        }
    }
}

impl<B, M> Drop for JanitorWorker<B, M> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn next_tick(ticker: &Mutex<Interval>) -> Instant {
    ticker.lock().await.tick().await
}

/// Worker loop: one sweep per tick until cancelled
///
/// The cancellation arm returns from the function. Cancellation wins when both
/// arms are ready, so no new cycle starts after `stop`.
async fn run_worker<B, M>(
    worker_id: usize,
    janitor: Arc<Janitor<B, M>>,
    ticker: SharedTicker,
    shutdown: CancellationToken,
) where
    B: BlobStore,
    M: MetadataStore,
{
    tracing::debug!("Cleanup worker {} started", worker_id);

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                tracing::info!("Cleanup worker {} exiting", worker_id);
                return;
            }
            _ = next_tick(&ticker) => {
                tracing::debug!("Cleanup worker {} starting sweep cycle", worker_id);
                janitor.run_once().await;
            }
        }
    }
}
