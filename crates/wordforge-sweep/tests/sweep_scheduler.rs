//! Integration tests for the sweep scheduler and background task.
//!
//! All timing tests run with `start_paused = true`, so the runtime jumps
//! the clock to the next timer whenever every task is idle.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wordforge_sweep::{Sweep, SweepConfig, SweepScheduler};

// =========================================================================
// Helpers
// =========================================================================

/// Counts calls and pretends to remove a fixed number of entries each time.
struct CountingTarget {
    calls: AtomicUsize,
    removes: usize,
}

impl CountingTarget {
    fn new(removes: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            removes,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Sweep for CountingTarget {
    fn sweep(&self) -> impl Future<Output = usize> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let removes = self.removes;
        async move { removes }
    }
}

fn every_10s() -> SweepConfig {
    SweepConfig::with_interval(Duration::from_secs(10))
}

// =========================================================================
// SweepConfig
// =========================================================================

#[test]
fn test_default_interval_is_fifteen_minutes() {
    assert_eq!(SweepConfig::default().interval, Duration::from_secs(900));
}

#[test]
fn test_validated_clamps_zero_interval() {
    let cfg = SweepConfig::with_interval(Duration::ZERO).validated();
    assert_eq!(cfg.interval, SweepConfig::MIN_INTERVAL);
}

#[test]
fn test_validated_keeps_reasonable_interval() {
    let cfg = every_10s().validated();
    assert_eq!(cfg.interval, Duration::from_secs(10));
}

// =========================================================================
// SweepScheduler
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_first_sweep_fires_after_one_interval() {
    let start = tokio::time::Instant::now();
    let mut s = SweepScheduler::new(every_10s());

    let info = s.wait_for_sweep().await;
    assert_eq!(info.sweep, 1);
    assert_eq!(info.sweeps_skipped, 0);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_sweeps_increment_monotonically() {
    let mut s = SweepScheduler::new(every_10s());
    for expected in 1..=4 {
        assert_eq!(s.wait_for_sweep().await.sweep, expected);
    }
    assert_eq!(s.sweep_count(), 4);
    assert_eq!(s.metrics().total_sweeps, 4);
}

#[tokio::test(start_paused = true)]
async fn test_late_wakeup_skips_missed_sweeps() {
    let mut s = SweepScheduler::new(every_10s());

    // Nobody waits for 35s: the 10s deadline is 25s stale.
    tokio::time::advance(Duration::from_secs(35)).await;

    let info = s.wait_for_sweep().await;
    assert_eq!(info.sweep, 1);
    assert_eq!(info.sweeps_skipped, 2);
    assert_eq!(s.metrics().total_skipped, 2);

    // Next deadline is measured from the late wakeup, not replayed.
    let before = tokio::time::Instant::now();
    s.wait_for_sweep().await;
    assert_eq!(before.elapsed(), Duration::from_secs(10));
}

#[test]
fn test_record_removed_accumulates() {
    let mut s = SweepScheduler::new(every_10s());
    s.record_removed(3);
    s.record_removed(0);
    s.record_removed(4);

    assert_eq!(s.metrics().total_removed, 7);
    assert_eq!(s.metrics().last_removed, 4);
}

// =========================================================================
// Background task
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_spawned_sweeper_runs_on_interval() {
    let target = CountingTarget::new(2);
    let handle = wordforge_sweep::spawn(Arc::clone(&target), every_10s());

    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(target.calls(), 3);

    let metrics = handle.stop().await.expect("sweeper should not panic");
    assert_eq!(metrics.total_sweeps, 3);
    assert_eq!(metrics.total_removed, 6);
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_sweep_never_sweeps() {
    let target = CountingTarget::new(1);
    let handle = wordforge_sweep::spawn(Arc::clone(&target), every_10s());

    assert!(!handle.is_finished());
    let metrics = handle.stop().await.unwrap();
    assert_eq!(metrics.total_sweeps, 0);
    assert_eq!(target.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_sweeps_after_stop() {
    let target = CountingTarget::new(0);
    let handle = wordforge_sweep::spawn(Arc::clone(&target), every_10s());

    tokio::time::sleep(Duration::from_secs(15)).await;
    handle.stop().await.unwrap();
    assert_eq!(target.calls(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(target.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_sweeper() {
    let target = CountingTarget::new(0);
    let handle = wordforge_sweep::spawn(Arc::clone(&target), every_10s());
    drop(handle);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(target.calls(), 0);
    // The task held the only other clone.
    assert_eq!(Arc::strong_count(&target), 1);
}
