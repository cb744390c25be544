use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{DelayMs, TimeoutMs},
    error::{ModelError, ModelResult},
    strategy::RetryPlacement,
};

/// Throttle and retry configuration of a request queue.
///
/// Fixed at construction time of the throttler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThrottleStrategy {
    /// Minimum spacing between the end of one attempt and the start of the next.
    pub throttle_delay_ms: DelayMs,
    /// Number of retries after the first attempt; `max_retries + 1` attempts in total.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles on every further retry (no jitter).
    pub initial_backoff_ms: DelayMs,
    /// Hard limit for a single attempt. `0` disables the guard.
    pub timeout_ms: TimeoutMs,
    /// Where a failed request re-enters the queue.
    pub placement: RetryPlacement,
}

impl Default for ThrottleStrategy {
    fn default() -> Self {
        Self {
            throttle_delay_ms: 500,
            max_retries: 5,
            initial_backoff_ms: 1_000,
            timeout_ms: 30_000,
            placement: RetryPlacement::default(),
        }
    }
}

impl ThrottleStrategy {
    /// Delay that precedes retry number `retry` (1-based): `initial_backoff_ms * 2^(retry-1)`.
    ///
    /// Saturates instead of overflowing for absurd retry counts.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use hng_model::ThrottleStrategy;
    ///
    /// let s = ThrottleStrategy::default();
    /// assert_eq!(s.backoff_for(1), Duration::from_millis(1_000));
    /// assert_eq!(s.backoff_for(3), Duration::from_millis(4_000));
    /// ```
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(63);
        let factor = 1u64.checked_shl(exp).unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }

    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }

    /// Per-attempt timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Reject configurations that cannot make progress.
    pub fn validate(&self) -> ModelResult<()> {
        if self.initial_backoff_ms == 0 && self.max_retries > 0 {
            return Err(ModelError::Invalid(
                "initialBackoffMs must be positive when retries are enabled".into(),
            ));
        }
        Ok(())
    }
}
