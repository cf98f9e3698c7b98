//! Application layer - wrappers that drive the domain state machines.
//!
//! This layer turns the pure throttle and debounce logic into callable
//! wrappers and manages their runtime behaviour:
//! - Throttled and debounced wrappers
//! - Rate limiter facade and its builder
//! - Configuration of default delays
//! - Metrics and periodic metrics reporting
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters and user code must implement. This keeps the application layer
//! independent from clock implementations and from the shape of user
//! callbacks.

pub mod config;
#[cfg(feature = "async")]
pub mod debounce;
pub mod limiter;
pub mod metrics;
pub mod ports;
#[cfg(feature = "async")]
pub mod reporter;
pub mod throttle;
