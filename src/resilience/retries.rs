//! Retry delay policy for the watch loop.

use std::time::Duration;

use crate::config::schema::{RetryConfig, RetryStrategy};
use crate::resilience::backoff::calculate_backoff;

/// How long the watch loop waits before re-polling after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Wait the same delay after every failure.
    Fixed(Duration),
    /// Double the delay per consecutive failure, capped at `max`, with jitter.
    Exponential { base: Duration, max: Duration },
}

impl RetryPolicy {
    /// Fixed delay expressed in whole seconds.
    pub fn fixed_secs(secs: u64) -> Self {
        RetryPolicy::Fixed(Duration::from_secs(secs))
    }

    /// Delay before the next attempt, given the number of consecutive
    /// failures so far (1 for the first failure).
    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        match *self {
            RetryPolicy::Fixed(delay) => delay,
            RetryPolicy::Exponential { base, max } => calculate_backoff(
                consecutive_failures.max(1),
                duration_ms(base),
                duration_ms(max),
            ),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::fixed_secs(RetryConfig::default().delay_secs)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        match config.strategy {
            RetryStrategy::Fixed => RetryPolicy::fixed_secs(config.delay_secs),
            RetryStrategy::Exponential => RetryPolicy::Exponential {
                base: Duration::from_millis(config.base_delay_ms),
                max: Duration::from_millis(config.max_delay_ms),
            },
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
