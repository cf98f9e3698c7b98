//! Infrastructure layer - external adapters.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time, Tokio time, mock)
//! - Test doubles for clocks and tracing output

pub mod clock;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for testing
/// call-shaping behavior.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// call-pacer = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
