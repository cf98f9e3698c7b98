//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Manually driven clock.
///
/// Time only moves when a test says so, which makes throttle cooldowns
/// reproducible down to the millisecond. Clones share the same time, so a
/// clone kept by the test can drive a clock handed to a wrapper.
///
/// # Examples
///
/// ```
/// use call_pacer::infrastructure::mocks::MockClock;
/// use call_pacer::application::ports::Clock;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let clock = MockClock::new(start);
///
/// clock.advance_millis(16);
/// assert_eq!(clock.now(), start + Duration::from_millis(16));
/// assert_eq!(clock.elapsed(), Duration::from_millis(16));
///
/// clock.set(start + Duration::from_secs(1));
/// assert_eq!(clock.elapsed(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    current_time: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        *self.time() += duration;
    }

    /// Advance the clock by a number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, instant: Instant) {
        *self.time() = instant;
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.time().saturating_duration_since(self.start)
    }

    fn time(&self) -> MutexGuard<'_, Instant> {
        self.current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.time()
    }
}
