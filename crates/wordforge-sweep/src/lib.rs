//! Periodic sweep task for Wordforge.
//!
//! Anything that needs housekeeping on a fixed cadence implements
//! [`Sweep`]; [`spawn`] drives it from a background task and hands back a
//! [`SweeperHandle`] that stops the task deterministically.
//!
//! ```ignore
//! let handle = wordforge_sweep::spawn(Arc::clone(&store), SweepConfig::default());
//! // ...
//! let metrics = handle.stop().await?;
//! ```
//!
//! The cadence comes from [`SweepScheduler`], which can also be embedded in
//! another task's `tokio::select!` loop directly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tracing::{debug, info, trace, warn};

// ---------------------------------------------------------------------------
// Sweep target
// ---------------------------------------------------------------------------

/// Something that can be swept.
pub trait Sweep: Send + Sync + 'static {
    /// Runs one pass and returns how many entries it removed.
    fn sweep(&self) -> impl Future<Output = usize> + Send;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Sweep cadence.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between two sweeps. Default: 15 minutes.
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15 * 60),
        }
    }
}

impl SweepConfig {
    /// Shortest interval the scheduler accepts.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }

    /// Clamps the interval up to [`Self::MIN_INTERVAL`].
    ///
    /// Called automatically by [`SweepScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                min_ms = Self::MIN_INTERVAL.as_millis() as u64,
                "sweep interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Sweep info and metrics
// ---------------------------------------------------------------------------

/// Returned by [`SweepScheduler::wait_for_sweep`] each time a sweep is due.
#[derive(Debug, Clone)]
pub struct SweepInfo {
    /// Monotonically increasing sweep number, starting at 1.
    pub sweep: u64,
    /// How many whole intervals were missed because the task woke late.
    /// Missed sweeps are skipped, never replayed.
    pub sweeps_skipped: u64,
}

/// Counters accumulated over the life of a scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepMetrics {
    pub total_sweeps: u64,
    pub total_skipped: u64,
    /// Sum of the counts passed to [`SweepScheduler::record_removed`].
    pub total_removed: u64,
    pub last_removed: usize,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval scheduler. The first sweep is due one interval after
/// creation.
pub struct SweepScheduler {
    interval: Duration,
    sweep_count: u64,
    next_sweep: Instant,
    metrics: SweepMetrics,
}

impl SweepScheduler {
    pub fn new(config: SweepConfig) -> Self {
        let config = config.validated();
        debug!(
            interval_secs = config.interval.as_secs_f64(),
            "sweep scheduler created"
        );
        Self {
            interval: config.interval,
            sweep_count: 0,
            next_sweep: Instant::now() + config.interval,
            metrics: SweepMetrics::default(),
        }
    }

    /// Waits until the next sweep is due.
    ///
    /// If the caller comes back late, the missed deadlines are counted in
    /// [`SweepInfo::sweeps_skipped`] and the next deadline is measured from
    /// now.
    pub async fn wait_for_sweep(&mut self) -> SweepInfo {
        time::sleep_until(self.next_sweep).await;

        let now = Instant::now();
        let late_by = now.saturating_duration_since(self.next_sweep);
        let sweeps_skipped = (late_by.as_nanos() / self.interval.as_nanos()) as u64;
        if sweeps_skipped > 0 {
            warn!(
                sweep = self.sweep_count + 1,
                skipped = sweeps_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "sweep overdue, skipping ahead"
            );
        }

        self.next_sweep = now + self.interval;
        self.sweep_count += 1;
        self.metrics.total_sweeps += 1;
        self.metrics.total_skipped += sweeps_skipped;

        trace!(sweep = self.sweep_count, "sweep due");

        SweepInfo {
            sweep: self.sweep_count,
            sweeps_skipped,
        }
    }

    /// Records how many entries the last sweep removed.
    pub fn record_removed(&mut self, removed: usize) {
        self.metrics.last_removed = removed;
        self.metrics.total_removed += removed as u64;
    }

    pub fn sweep_count(&self) -> u64 {
        self.sweep_count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Handle to a running sweep task.
///
/// [`stop`](Self::stop) ends the task and waits for it. Dropping the handle
/// also ends the task, without waiting.
pub struct SweeperHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<SweepMetrics>,
}

impl SweeperHandle {
    /// Signals the task to stop and waits for it to exit.
    ///
    /// A sweep already in progress runs to completion first.
    pub async fn stop(self) -> Result<SweepMetrics, JoinError> {
        // Err means the task is already gone; the join below reports why.
        let _ = self.stop_tx.send(());
        self.task.await
    }

    /// `true` once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a task that calls `target.sweep()` every `config.interval`.
///
/// Must be called from within a Tokio runtime.
pub fn spawn<S: Sweep>(target: Arc<S>, config: SweepConfig) -> SweeperHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let mut scheduler = SweepScheduler::new(config);

    let task = tokio::spawn(async move {
        info!(
            interval_secs = scheduler.interval().as_secs_f64(),
            "sweeper started"
        );
        loop {
            tokio::select! {
                // Fires on an explicit stop and when the handle is dropped.
                _ = &mut stop_rx => break,
                info = scheduler.wait_for_sweep() => {
                    let removed = target.sweep().await;
                    scheduler.record_removed(removed);
                    debug!(sweep = info.sweep, removed, "sweep finished");
                }
            }
        }
        info!(sweeps = scheduler.sweep_count(), "sweeper stopped");
        scheduler.metrics().clone()
    });

    SweeperHandle { stop_tx, task }
}
