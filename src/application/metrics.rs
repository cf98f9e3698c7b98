//! Observability metrics for call shaping.
//!
//! Provides counters describing how many calls reached shaped actions and
//! what happened to them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking call-shaping statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters, so one `Metrics` can be handed to every
/// wrapper built by a `RateLimiter`.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of calls made to wrappers
    calls: AtomicU64,
    /// Total number of times a wrapped action actually ran
    executions: AtomicU64,
    /// Calls dropped by a throttle cooldown
    calls_dropped: AtomicU64,
    /// Debounced calls replaced by a later call before firing
    calls_superseded: AtomicU64,
    /// Debounced calls discarded by an explicit cancel
    calls_cancelled: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                calls: AtomicU64::new(0),
                executions: AtomicU64::new(0),
                calls_dropped: AtomicU64::new(0),
                calls_superseded: AtomicU64::new(0),
                calls_cancelled: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_call(&self) {
        self.inner.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_execution(&self) {
        self.inner.executions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.inner.calls_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_superseded(&self) {
        self.inner.calls_superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancelled(&self) {
        self.inner.calls_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of calls.
    pub fn calls(&self) -> u64 {
        self.inner.calls.load(Ordering::Relaxed)
    }

    /// Get the total number of action executions.
    pub fn executions(&self) -> u64 {
        self.inner.executions.load(Ordering::Relaxed)
    }

    /// Get the number of calls dropped during throttle cooldowns.
    pub fn calls_dropped(&self) -> u64 {
        self.inner.calls_dropped.load(Ordering::Relaxed)
    }

    /// Get the number of debounced calls replaced by a newer call.
    pub fn calls_superseded(&self) -> u64 {
        self.inner.calls_superseded.load(Ordering::Relaxed)
    }

    /// Get the number of debounced calls discarded by `cancel()`.
    pub fn calls_cancelled(&self) -> u64 {
        self.inner.calls_cancelled.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: self.calls(),
            executions: self.executions(),
            calls_dropped: self.calls_dropped(),
            calls_superseded: self.calls_superseded(),
            calls_cancelled: self.calls_cancelled(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.calls.store(0, Ordering::Relaxed);
        self.inner.executions.store(0, Ordering::Relaxed);
        self.inner.calls_dropped.store(0, Ordering::Relaxed);
        self.inner.calls_superseded.store(0, Ordering::Relaxed);
        self.inner.calls_cancelled.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Total number of calls made to wrappers
    pub calls: u64,
    /// Total number of action executions
    pub executions: u64,
    /// Calls dropped during throttle cooldowns
    pub calls_dropped: u64,
    /// Debounced calls replaced by a newer call
    pub calls_superseded: u64,
    /// Debounced calls discarded by `cancel()`
    pub calls_cancelled: u64,
}

impl MetricsSnapshot {
    /// Calls that never turned into an execution.
    pub fn total_suppressed(&self) -> u64 {
        self.calls_dropped
            .saturating_add(self.calls_superseded)
            .saturating_add(self.calls_cancelled)
    }

    /// Fraction of calls that did not execute (0.0 to 1.0).
    ///
    /// Returns 0.0 if no calls have been made.
    pub fn suppression_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_suppressed() as f64 / self.calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_counters() {
        let metrics = Metrics::new();
        metrics.record_call();
        metrics.record_call();
        metrics.record_call();
        metrics.record_execution();
        metrics.record_dropped();
        metrics.record_superseded();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.calls, 3);
        assert_eq!(snapshot.executions, 1);
        assert_eq!(snapshot.calls_dropped, 1);
        assert_eq!(snapshot.calls_superseded, 1);
        assert_eq!(snapshot.calls_cancelled, 0);
    }

    #[test]
    fn test_suppression_rate() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().suppression_rate(), 0.0);

        for _ in 0..4 {
            metrics.record_call();
        }
        metrics.record_execution();
        metrics.record_dropped();
        metrics.record_dropped();
        metrics.record_cancelled();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_suppressed(), 3);
        assert!((snapshot.suppression_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_call();
        metrics.record_execution();
        metrics.record_cancelled();

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_metrics_clone_shares_counters() {
        let metrics1 = Metrics::new();
        metrics1.record_call();

        let metrics2 = metrics1.clone();
        metrics2.record_call();

        assert_eq!(metrics1.calls(), 2);
        assert_eq!(metrics2.calls(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = vec![];

        for _ in 0..8 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    m.record_call();
                    m.record_dropped();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.calls(), 800);
        assert_eq!(metrics.calls_dropped(), 800);
    }
}
