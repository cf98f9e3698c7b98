//! Millisecond delays for debounce and throttle wrappers.
//!
//! Delays arrive from configuration and event-handler setup code as signed
//! millisecond counts. Negative values are rejected rather than clamped.

use std::fmt;
use std::time::Duration;

/// Error returned when a negative delay is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDelayError {
    /// The rejected value, in milliseconds
    pub millis: i64,
}

impl fmt::Display for InvalidDelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delay must be a non-negative number of milliseconds, got {}",
            self.millis
        )
    }
}

impl std::error::Error for InvalidDelayError {}

/// A non-negative wait duration.
///
/// # Example
/// ```
/// use call_pacer::Delay;
/// use std::time::Duration;
///
/// let delay = Delay::from_millis(250).unwrap();
/// assert_eq!(delay.as_duration(), Duration::from_millis(250));
///
/// assert!(Delay::from_millis(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Delay(Duration);

impl Delay {
    /// A delay of zero milliseconds.
    pub const ZERO: Delay = Delay(Duration::ZERO);

    /// Create a delay from a signed millisecond count.
    ///
    /// # Errors
    /// Returns `InvalidDelayError` if `millis` is negative.
    pub fn from_millis(millis: i64) -> Result<Self, InvalidDelayError> {
        u64::try_from(millis)
            .map(|ms| Delay(Duration::from_millis(ms)))
            .map_err(|_| InvalidDelayError { millis })
    }

    /// The delay as a `Duration`.
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// The delay in whole milliseconds.
    pub fn as_millis(&self) -> u128 {
        self.0.as_millis()
    }

    /// Whether this delay is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for Delay {
    fn from(duration: Duration) -> Self {
        Delay(duration)
    }
}

impl From<Delay> for Duration {
    fn from(delay: Delay) -> Self {
        delay.0
    }
}

impl TryFrom<i64> for Delay {
    type Error = InvalidDelayError;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Delay::from_millis(millis)
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        let delay = Delay::from_millis(16).unwrap();
        assert_eq!(delay.as_duration(), Duration::from_millis(16));
        assert_eq!(delay.as_millis(), 16);
        assert!(!delay.is_zero());
    }

    #[test]
    fn test_zero_is_valid() {
        let delay = Delay::from_millis(0).unwrap();
        assert_eq!(delay, Delay::ZERO);
        assert!(delay.is_zero());
    }

    #[test]
    fn test_negative_rejected() {
        let err = Delay::from_millis(-250).unwrap_err();
        assert_eq!(err, InvalidDelayError { millis: -250 });
        assert_eq!(
            err.to_string(),
            "delay must be a non-negative number of milliseconds, got -250"
        );
    }

    #[test]
    fn test_try_from_i64() {
        assert!(Delay::try_from(i64::MIN).is_err());
        assert_eq!(
            Delay::try_from(1_000).unwrap().as_duration(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Delay::from_millis(250).unwrap().to_string(), "250ms");
    }

    #[test]
    fn test_ordering() {
        let short = Delay::from_millis(5).unwrap();
        let long = Delay::from(Duration::from_secs(1));
        assert!(short < long);
    }
}
