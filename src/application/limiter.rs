//! Rate limiter facade.
//!
//! `RateLimiter` hands out throttled and debounced wrappers that share one
//! clock, one set of metrics and one set of default delays.

use crate::application::config::{PacerConfig, ValidatedConfig};
use crate::application::metrics::Metrics;
use crate::application::ports::{Action, Clock};
use crate::application::throttle::Throttled;
use crate::domain::delay::{Delay, InvalidDelayError};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "async")]
use crate::application::debounce::Debounced;

/// Error returned when building a rate limiter or a debounced wrapper fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A configured delay was negative
    InvalidDelay(InvalidDelayError),
    /// A debounced wrapper was built outside a Tokio runtime
    MissingRuntime,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidDelay(e) => write!(f, "invalid delay: {}", e),
            BuildError::MissingRuntime => {
                write!(f, "debounce requires a running Tokio runtime")
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::InvalidDelay(e) => Some(e),
            BuildError::MissingRuntime => None,
        }
    }
}

impl From<InvalidDelayError> for BuildError {
    fn from(e: InvalidDelayError) -> Self {
        BuildError::InvalidDelay(e)
    }
}

/// Builder for constructing a `RateLimiter`.
#[derive(Default)]
pub struct RateLimiterBuilder {
    clock: Option<Arc<dyn Clock>>,
    metrics: Option<Metrics>,
    config: PacerConfig,
}

impl RateLimiterBuilder {
    /// Set a custom clock for throttled wrappers (default: `TokioClock` with
    /// the `async` feature, `SystemClock` otherwise).
    ///
    /// Debounced wrappers always read Tokio's clock, since their timers
    /// sleep on it.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Record into existing metrics instead of a fresh set.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Set the default delays.
    pub fn with_config(mut self, config: PacerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default debounce delay.
    pub fn with_debounce_delay_ms(mut self, millis: i64) -> Self {
        self.config.debounce_delay_ms = millis;
        self
    }

    /// Set the default throttle limit.
    pub fn with_throttle_limit_ms(mut self, millis: i64) -> Self {
        self.config.throttle_limit_ms = millis;
        self
    }

    /// Build the rate limiter.
    ///
    /// # Errors
    /// Returns `BuildError::InvalidDelay` if a configured delay is negative.
    pub fn build(self) -> Result<RateLimiter, BuildError> {
        let config = self.config.validate()?;
        let clock = self.clock.unwrap_or_else(default_clock);
        let metrics = self.metrics.unwrap_or_default();

        tracing::debug!(
            debounce_delay = %config.debounce_delay,
            throttle_limit = %config.throttle_limit,
            "rate limiter built"
        );

        Ok(RateLimiter {
            clock,
            metrics,
            config,
        })
    }
}

/// Factory for throttled and debounced wrappers.
///
/// # Example
/// ```
/// use call_pacer::{Delay, RateLimiter};
///
/// let limiter = RateLimiter::builder()
///     .with_throttle_limit_ms(100)
///     .build()
///     .unwrap();
///
/// let on_resize = limiter.throttle_default(|w: u32, h: u32| w * h);
/// assert_eq!(on_resize.call((4, 5)), Some(20));
/// assert_eq!(on_resize.call((6, 7)), None);
///
/// let on_click = limiter.throttle(|| "clicked", Delay::ZERO);
/// assert_eq!(on_click.call(()), Some("clicked"));
/// assert_eq!(on_click.call(()), Some("clicked"));
///
/// assert_eq!(limiter.metrics().executions(), 3);
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    metrics: Metrics,
    config: ValidatedConfig,
}

impl RateLimiter {
    /// Create a rate limiter with default delays and a fresh set of metrics.
    pub fn new() -> Self {
        Self {
            clock: default_clock(),
            metrics: Metrics::new(),
            config: ValidatedConfig::default(),
        }
    }

    /// Create a builder for a custom rate limiter.
    pub fn builder() -> RateLimiterBuilder {
        RateLimiterBuilder::default()
    }

    /// Wrap `action` so it runs at most once per `limit`, on the leading edge.
    pub fn throttle<F, Args>(&self, action: F, limit: Delay) -> Throttled<F, Args>
    where
        F: Action<Args>,
    {
        Throttled::new(action, limit, Arc::clone(&self.clock), self.metrics.clone())
    }

    /// Throttle with the configured default limit.
    pub fn throttle_default<F, Args>(&self, action: F) -> Throttled<F, Args>
    where
        F: Action<Args>,
    {
        self.throttle(action, self.config.throttle_limit)
    }

    /// Wrap `action` so a burst of calls runs it once, `delay` after the
    /// last call, with the last call's arguments.
    ///
    /// # Errors
    /// Returns `BuildError::MissingRuntime` when called outside a Tokio
    /// runtime.
    #[cfg(feature = "async")]
    pub fn debounce<F, Args>(&self, action: F, delay: Delay) -> Result<Debounced<F, Args>, BuildError>
    where
        F: Action<Args> + Send + Sync + 'static,
        Args: Send + 'static,
    {
        Debounced::new(action, delay, self.metrics.clone())
    }

    /// Debounce with the configured default delay.
    ///
    /// # Errors
    /// Same as [`RateLimiter::debounce`].
    #[cfg(feature = "async")]
    pub fn debounce_default<F, Args>(&self, action: F) -> Result<Debounced<F, Args>, BuildError>
    where
        F: Action<Args> + Send + Sync + 'static,
        Args: Send + 'static,
    {
        self.debounce(action, self.config.debounce_delay)
    }

    /// Metrics shared by every wrapper from this limiter.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Default delays.
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Clock used by throttled wrappers.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

/// Throttle `action` to at most one run per `limit_ms` milliseconds.
///
/// # Errors
/// Returns `InvalidDelayError` if `limit_ms` is negative.
pub fn throttle<F, Args>(action: F, limit_ms: i64) -> Result<Throttled<F, Args>, InvalidDelayError>
where
    F: Action<Args>,
{
    let limit = Delay::from_millis(limit_ms)?;
    Ok(Throttled::new(action, limit, default_clock(), Metrics::new()))
}

/// Debounce `action` by `delay_ms` milliseconds.
///
/// # Errors
/// Returns `BuildError::InvalidDelay` if `delay_ms` is negative and
/// `BuildError::MissingRuntime` outside a Tokio runtime.
#[cfg(feature = "async")]
pub fn debounce<F, Args>(action: F, delay_ms: i64) -> Result<Debounced<F, Args>, BuildError>
where
    F: Action<Args> + Send + Sync + 'static,
    Args: Send + 'static,
{
    let delay = Delay::from_millis(delay_ms)?;
    Debounced::new(action, delay, Metrics::new())
}

#[cfg(feature = "async")]
fn default_clock() -> Arc<dyn Clock> {
    Arc::new(crate::infrastructure::clock::TokioClock::new())
}

#[cfg(not(feature = "async"))]
fn default_clock() -> Arc<dyn Clock> {
    Arc::new(crate::infrastructure::clock::SystemClock::new())
}
