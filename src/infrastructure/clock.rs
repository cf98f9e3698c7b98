//! Clock adapters for time operations.
//!
//! Provides `SystemClock` for plain `Instant::now()` time and, with the
//! `async` feature, `TokioClock`, which follows Tokio's clock so paused
//! test time is seen by throttles too.
//!
//! # Testing
//!
//! See `MockClock` (in `crate::infrastructure::mocks`) for a controllable test clock.
//! Available with the `test-helpers` feature or in test builds:
//!
//! ```toml
//! [dev-dependencies]
//! call-pacer = { version = "*", features = ["test-helpers"] }
//! ```

use crate::application::ports::Clock;
use std::time::Instant;

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock backed by `tokio::time::Instant`.
///
/// Outside a paused runtime this reads the same time as `SystemClock`. Inside
/// a runtime whose clock is paused, it reports the paused time and moves with
/// `tokio::time::advance`.
#[cfg(feature = "async")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[cfg(feature = "async")]
impl TokioClock {
    /// Create a new Tokio clock.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "async")]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();

        assert!(t2 > t1);
    }

    #[cfg(feature = "async")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let t1 = clock.now();
        tokio::time::advance(Duration::from_millis(16)).await;
        let t2 = clock.now();

        assert_eq!(t2 - t1, Duration::from_millis(16));
    }
}
