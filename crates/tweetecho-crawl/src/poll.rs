//! Polling schedule for asynchronous crawl jobs.
//!
//! The crawl service completes jobs out-of-band; callers poll job status with
//! exponential backoff. The schedule is a pure function of the config so it
//! can be asserted exactly in tests.

use std::time::Duration;

/// Backoff policy for status checks.
///
/// Every attempt (success or failure) consumes one slot and multiplies the
/// delay; the sleep happens *before* each status check.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay before the first status check, in milliseconds.
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after every attempt.
    pub multiplier: f64,
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 2_000,
            multiplier: 1.5,
            max_attempts: 10,
        }
    }
}

impl PollConfig {
    /// Returns the full sleep schedule: one [`Duration`] per attempt.
    ///
    /// With the defaults this is exactly 2000, 3000, 4500, 6750, ... ms for
    /// 10 attempts.
    #[must_use]
    pub fn delay_schedule(&self) -> Vec<Duration> {
        let mut delays = Vec::with_capacity(self.max_attempts as usize);
        let mut delay_ms = self.initial_delay_ms as f64;
        for _ in 0..self.max_attempts {
            delays.push(Duration::from_millis(delay_ms as u64));
            delay_ms *= self.multiplier;
        }
        delays
    }
}
