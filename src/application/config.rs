//! Default delays for a `RateLimiter`.

use crate::domain::delay::{Delay, InvalidDelayError};

/// Default debounce delay, in milliseconds.
pub const DEFAULT_DEBOUNCE_DELAY_MS: i64 = 250;

/// Default throttle limit, in milliseconds (roughly one frame at 60fps).
pub const DEFAULT_THROTTLE_LIMIT_MS: i64 = 16;

/// Default delays applied by `RateLimiter::debounce_default` and
/// `RateLimiter::throttle_default`.
///
/// Values are signed so configuration files can be deserialized as-is and
/// rejected by [`PacerConfig::validate`] instead of failing to parse.
///
/// With the `serde` feature enabled, missing fields fall back to defaults:
///
/// ```ignore
/// let config: PacerConfig = serde_json::from_str(r#"{"throttle_limit_ms": 100}"#)?;
/// assert_eq!(config.debounce_delay_ms, 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PacerConfig {
    /// Delay used by debounced wrappers
    pub debounce_delay_ms: i64,
    /// Cooldown used by throttled wrappers
    pub throttle_limit_ms: i64,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            debounce_delay_ms: DEFAULT_DEBOUNCE_DELAY_MS,
            throttle_limit_ms: DEFAULT_THROTTLE_LIMIT_MS,
        }
    }
}

impl PacerConfig {
    /// Set the debounce delay.
    pub fn with_debounce_delay_ms(mut self, millis: i64) -> Self {
        self.debounce_delay_ms = millis;
        self
    }

    /// Set the throttle limit.
    pub fn with_throttle_limit_ms(mut self, millis: i64) -> Self {
        self.throttle_limit_ms = millis;
        self
    }

    /// Check both values and convert them to delays.
    ///
    /// # Errors
    /// Returns `InvalidDelayError` for the first negative value found.
    pub fn validate(&self) -> Result<ValidatedConfig, InvalidDelayError> {
        Ok(ValidatedConfig {
            debounce_delay: Delay::from_millis(self.debounce_delay_ms)?,
            throttle_limit: Delay::from_millis(self.throttle_limit_ms)?,
        })
    }
}

/// A `PacerConfig` whose values have been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Delay used by debounced wrappers
    pub debounce_delay: Delay,
    /// Cooldown used by throttled wrappers
    pub throttle_limit: Delay,
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Delay::from(std::time::Duration::from_millis(
                DEFAULT_DEBOUNCE_DELAY_MS as u64,
            )),
            throttle_limit: Delay::from(std::time::Duration::from_millis(
                DEFAULT_THROTTLE_LIMIT_MS as u64,
            )),
        }
    }
}
