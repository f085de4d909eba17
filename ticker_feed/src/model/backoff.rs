//! Wait-time tracker for the poll loop.
//!
//! After a successful poll the loop waits the base interval. Each consecutive
//! failure doubles the wait until it reaches the configured ceiling:
//!
//! - `record_failure()` - count one more failed poll.
//! - `record_success()` - reset the count.
//! - `delay()` - deterministic wait for the current count.
//! - `jittered_delay()` - `delay()` plus up to 10 % random spread, still capped.

use std::time::Duration;

use rand::Rng;

/// Largest doubling exponent applied to the base interval.
const MAX_SHIFT: u32 = 16;

/// Exponential backoff with a ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    failures: u32,
}

impl Backoff {
    /// Create a tracker waiting `base` normally and at most `max` after failures.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            failures: 0,
        }
    }

    /// Count a failed poll and return the new streak length.
    pub fn record_failure(&mut self) -> u32 {
        self.failures = self.failures.saturating_add(1);
        self.failures
    }

    /// Reset after a successful poll.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Wait before the next poll.
    pub fn delay(&self) -> Duration {
        if self.failures == 0 {
            return self.base;
        }
        let shift = (self.failures - 1).min(MAX_SHIFT);
        self.base.saturating_mul(1u32 << shift).min(self.max)
    }

    /// `delay()` with random spread after failures.
    pub fn jittered_delay(&self) -> Duration {
        let delay = self.delay();
        if self.failures == 0 {
            return delay;
        }
        let spread_ms = (delay.as_millis() / 10) as u64;
        if spread_ms == 0 {
            return delay;
        }
        let extra = rand::rng().random_range(0..=spread_ms);
        (delay + Duration::from_millis(extra)).min(self.max)
    }
}
