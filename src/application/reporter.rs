//! Periodic metrics reporting.
//!
//! Emits a `MetricsSnapshot` on a fixed interval so call-shaping behaviour
//! shows up in the application's logs.

use crate::application::metrics::{Metrics, MetricsSnapshot};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Function type for emitting a metrics snapshot.
pub type SnapshotFormatter = Arc<dyn Fn(&MetricsSnapshot) + Send + Sync + 'static>;

/// Error returned when reporter configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterConfigError {
    /// Report interval duration must be greater than zero
    ZeroInterval,
}

impl fmt::Display for ReporterConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterConfigError::ZeroInterval => {
                write!(f, "report interval must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ReporterConfigError {}

/// Error returned when the reporter task does not stop cleanly.
#[derive(Debug)]
pub enum ShutdownError {
    /// The reporter task panicked
    TaskPanicked,
    /// The reporter task was cancelled before it could stop
    TaskCancelled,
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownError::TaskPanicked => write!(f, "metrics reporter task panicked"),
            ShutdownError::TaskCancelled => write!(f, "metrics reporter task was cancelled"),
        }
    }
}

impl std::error::Error for ShutdownError {}

/// Configuration for metrics reporting.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// How often to report
    pub interval: Duration,
    /// Skip reports when nothing changed since the previous one
    pub skip_idle: bool,
    /// Emit one last snapshot on shutdown
    pub emit_final: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            skip_idle: true,
            emit_final: false,
        }
    }
}

impl ReporterConfig {
    /// Create a reporter config with the specified interval.
    ///
    /// # Errors
    /// Returns `ReporterConfigError::ZeroInterval` if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, ReporterConfigError> {
        if interval.is_zero() {
            return Err(ReporterConfigError::ZeroInterval);
        }
        Ok(Self {
            interval,
            ..Self::default()
        })
    }

    /// Set whether unchanged snapshots are skipped.
    pub fn with_skip_idle(mut self, skip_idle: bool) -> Self {
        self.skip_idle = skip_idle;
        self
    }

    /// Set whether a final snapshot is emitted on shutdown.
    pub fn with_emit_final(mut self, emit_final: bool) -> Self {
        self.emit_final = emit_final;
        self
    }
}

/// Default formatter: one INFO event per snapshot.
pub fn log_snapshot(snapshot: &MetricsSnapshot) {
    tracing::info!(
        calls = snapshot.calls,
        executions = snapshot.executions,
        dropped = snapshot.calls_dropped,
        superseded = snapshot.calls_superseded,
        cancelled = snapshot.calls_cancelled,
        suppression_rate = snapshot.suppression_rate(),
        "call pacing metrics"
    );
}

/// Reports metrics snapshots periodically.
pub struct MetricsReporter {
    metrics: Metrics,
    config: ReporterConfig,
}

impl MetricsReporter {
    /// Create a new reporter.
    pub fn new(metrics: Metrics, config: ReporterConfig) -> Self {
        Self { metrics, config }
    }

    /// Spawn the reporting task on the current runtime.
    ///
    /// The first report is emitted after one full interval.
    pub fn start(self, formatter: SnapshotFormatter) -> ReporterHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let Self { metrics, config } = self;

        let join = tokio::spawn(async move {
            let mut ticker = interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() completes its first tick immediately
            ticker.tick().await;

            let mut last: Option<MetricsSnapshot> = None;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = metrics.snapshot();
                        if config.skip_idle && last == Some(snapshot) {
                            continue;
                        }
                        formatter(&snapshot);
                        last = Some(snapshot);
                    }
                    result = &mut shutdown_rx => {
                        // Err means the handle was dropped without shutdown()
                        if result.is_ok() && config.emit_final {
                            formatter(&metrics.snapshot());
                        }
                        tracing::debug!("metrics reporter stopped");
                        break;
                    }
                }
            }
        });

        ReporterHandle {
            shutdown_tx: Some(shutdown_tx),
            join,
        }
    }

    /// Get the reporter configuration.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }
}

/// Handle to a running metrics reporter.
///
/// Dropping the handle also stops the task, without waiting for it and
/// without a final snapshot.
pub struct ReporterHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl ReporterHandle {
    /// Whether the reporter task is still running.
    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }

    /// Stop the reporter and wait for it to finish.
    ///
    /// # Errors
    /// Returns `ShutdownError` if the task panicked or was cancelled.
    pub async fn shutdown(mut self) -> Result<(), ShutdownError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // The task may already be gone; joining reports why
            let _ = tx.send(());
        }

        match self.join.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_panic() => Err(ShutdownError::TaskPanicked),
            Err(_) => Err(ShutdownError::TaskCancelled),
        }
    }
}

impl fmt::Debug for ReporterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn collecting() -> (SnapshotFormatter, Arc<Mutex<Vec<MetricsSnapshot>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let formatter: SnapshotFormatter =
            Arc::new(move |s: &MetricsSnapshot| seen_clone.lock().unwrap().push(*s));
        (formatter, seen)
    }

    #[test]
    fn test_config_zero_interval() {
        let result = ReporterConfig::new(Duration::ZERO);
        assert!(matches!(result, Err(ReporterConfigError::ZeroInterval)));
    }

    #[test]
    fn test_config_valid_interval() {
        let config = ReporterConfig::new(Duration::from_secs(5)).unwrap();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert!(config.skip_idle);
        assert!(!config.emit_final);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_reports() {
        let metrics = Metrics::new();
        let config = ReporterConfig::new(Duration::from_millis(100))
            .unwrap()
            .with_skip_idle(false);
        let (formatter, seen) = collecting();

        let handle = MetricsReporter::new(metrics.clone(), config).start(formatter);
        metrics.record_call();

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(handle.is_running());
        handle.shutdown().await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|s| s.calls == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_idle() {
        let metrics = Metrics::new();
        let config = ReporterConfig::new(Duration::from_millis(100)).unwrap();
        let (formatter, seen) = collecting();

        let handle = MetricsReporter::new(metrics.clone(), config).start(formatter);

        tokio::time::sleep(Duration::from_millis(150)).await;
        metrics.record_call();
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.shutdown().await.unwrap();

        // t=100 (empty), t=200 (one call), then unchanged at 300 and 400
        let calls: Vec<u64> = seen.lock().unwrap().iter().map(|s| s.calls).collect();
        assert_eq!(calls, vec![0, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_final_on_shutdown() {
        let metrics = Metrics::new();
        let config = ReporterConfig::new(Duration::from_secs(60))
            .unwrap()
            .with_emit_final(true);
        let (formatter, seen) = collecting();

        let handle = MetricsReporter::new(metrics.clone(), config).start(formatter);
        metrics.record_call();
        metrics.record_execution();
        tokio::task::yield_now().await;

        handle.shutdown().await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].executions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_without_final_snapshot() {
        use crate::infrastructure::mocks::MockCaptureLayer;
        use tracing_subscriber::layer::SubscriberExt;

        let capture = MockCaptureLayer::new();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

        let metrics = Metrics::new();
        let config = ReporterConfig::new(Duration::from_secs(60))
            .unwrap()
            .with_emit_final(true);
        let (formatter, seen) = collecting();

        let handle = MetricsReporter::new(metrics.clone(), config).start(formatter);
        metrics.record_call();
        tokio::task::yield_now().await;

        drop(handle);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(capture.messages(), vec!["metrics reporter stopped".to_string()]);
        assert_eq!(capture.count_at(tracing::Level::DEBUG), 1);
    }

    #[tokio::test]
    async fn test_shutdown_reports_panic() {
        let metrics = Metrics::new();
        let config = ReporterConfig::new(Duration::from_millis(10))
            .unwrap()
            .with_skip_idle(false);
        let formatter: SnapshotFormatter = Arc::new(|_: &MetricsSnapshot| panic!("formatter failed"));

        let handle = MetricsReporter::new(metrics, config).start(formatter);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_running());
        assert!(matches!(
            handle.shutdown().await,
            Err(ShutdownError::TaskPanicked)
        ));
    }
}
