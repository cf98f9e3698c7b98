//! # call-pacer
//!
//! Debounce and throttle wrappers for high-frequency callbacks.
//!
//! Input, scroll and resize handlers fire far more often than the work behind
//! them needs to run. This crate wraps any `Fn` in one of two call-shaping
//! policies:
//!
//! - **Debounce**: every call restarts a timer; the action runs once, with
//!   the arguments of the last call, after `delay` has passed with no
//!   further calls.
//! - **Throttle**: the first call runs immediately, calls during the
//!   following `limit` are dropped, and the first call after the window runs
//!   again.
//!
//! ## Quick Start
//!
//! ```rust
//! use call_pacer::{debounce, throttle};
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Validate only once typing pauses for 250ms
//! let last = Arc::new(Mutex::new(String::new()));
//! let sink = Arc::clone(&last);
//! let on_input = debounce(move |value: String| *sink.lock().unwrap() = value, 250).unwrap();
//!
//! on_input.call(("a".to_string(),));
//! on_input.call(("ab".to_string(),));
//! tokio::time::sleep(Duration::from_millis(300)).await;
//! assert_eq!(*last.lock().unwrap(), "ab");
//!
//! // Update progress at most once per frame
//! let on_scroll = throttle(|top: f64| top.round() as u32, 16).unwrap();
//! assert_eq!(on_scroll.call((120.4,)), Some(120));
//! assert_eq!(on_scroll.call((121.0,)), None);
//! # }
//! ```
//!
//! ## Shared Defaults and Metrics
//!
//! A [`RateLimiter`] hands out wrappers that share one clock, one set of
//! [`Metrics`] and configurable default delays (250ms debounce, 16ms
//! throttle):
//!
//! ```rust
//! use call_pacer::RateLimiter;
//!
//! let limiter = RateLimiter::builder()
//!     .with_throttle_limit_ms(100)
//!     .build()
//!     .unwrap();
//!
//! let on_resize = limiter.throttle_default(|width: u32| width / 2);
//! on_resize.call((800,));
//! on_resize.call((810,));
//!
//! let snapshot = limiter.metrics().snapshot();
//! assert_eq!(snapshot.executions, 1);
//! assert_eq!(snapshot.calls_dropped, 1);
//! ```
//!
//! Negative delays are rejected with [`InvalidDelayError`] rather than
//! clamped.
//!
//! ## Arguments and Return Values
//!
//! Wrappers accept any closure of up to six arguments through the [`Action`]
//! trait. Arguments are passed as a tuple and reach the action unchanged.
//! Whatever the closure captures acts as its invocation context.
//!
//! A throttled call returns `Some(output)` when the action ran and `None`
//! when it was dropped. A debounced call returns nothing: the action runs
//! later, on the Tokio runtime the wrapper was built on, and its output is
//! discarded.
//!
//! ## Form Helpers
//!
//! [`validate_field`] checks email, telephone and free-text values the way
//! a debounced input handler needs, and [`scroll_progress`] turns scroll
//! offsets into a clamped percentage for a throttled scroll handler. See
//! `demos/` for complete programs.
//!
//! ## Cargo Features
//!
//! - `async` (default): [`Debounced`], [`TokioClock`] and the periodic
//!   [`MetricsReporter`]. Throttling never needs a runtime.
//! - `serde`: `Serialize`/`Deserialize` for [`PacerConfig`].
//! - `test-helpers`: mock clock and capture layer under
//!   `infrastructure::mocks`.
//!
//! ## Logging
//!
//! Wrappers log through `tracing`: executions at TRACE, dropped, superseded
//! and cancelled calls at DEBUG. Enable them with a subscriber filter such as
//! `RUST_LOG=call_pacer=debug`.

// Domain layer - pure call-shaping logic
pub mod domain;

// Application layer - wrappers, facade and metrics
pub mod application;

// Infrastructure layer - clocks and test doubles
pub mod infrastructure;

pub use domain::{
    delay::{Delay, InvalidDelayError},
    policy::{
        Armed, CallDecision, DebounceSchedule, DebounceState, Generation, ThrottleGate,
        ThrottleState,
    },
    progress::scroll_progress,
    validation::{validate_field, FieldKind, FieldValidity},
};

pub use application::{
    config::{PacerConfig, ValidatedConfig, DEFAULT_DEBOUNCE_DELAY_MS, DEFAULT_THROTTLE_LIMIT_MS},
    limiter::{throttle, BuildError, RateLimiter, RateLimiterBuilder},
    metrics::{Metrics, MetricsSnapshot},
    ports::{Action, Clock},
    throttle::Throttled,
};

#[cfg(feature = "async")]
pub use application::{
    debounce::Debounced,
    limiter::debounce,
    reporter::{
        log_snapshot, MetricsReporter, ReporterConfig, ReporterConfigError, ReporterHandle,
        ShutdownError, SnapshotFormatter,
    },
};

pub use infrastructure::clock::SystemClock;

#[cfg(feature = "async")]
pub use infrastructure::clock::TokioClock;
