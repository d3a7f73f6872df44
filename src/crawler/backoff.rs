//! Linear backoff for malformed (rate-limited) responses
//!
//! The n-th consecutive malformed response for the same page waits
//! `base * n`, capped at `max_delay`. The counter resets as soon as a page
//! decodes.

use crate::config::HarvestConfig;
use std::time::Duration;

/// Backoff parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay unit multiplied by the attempt number
    pub base: Duration,

    /// Ceiling for a single wait
    pub max_delay: Duration,

    /// Consecutive failures tolerated for one page, None for no limit
    pub max_retries: Option<u32>,
}

impl BackoffPolicy {
    /// Builds a policy from the harvest configuration
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            base: Duration::from_millis(config.backoff_base_ms),
            max_delay: Duration::from_millis(config.backoff_max_ms),
            max_retries: (config.max_retries > 0).then_some(config.max_retries),
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt).min(self.max_delay)
    }
}

/// Consecutive malformed responses for the current page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    count: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one malformed response
    ///
    /// # Returns
    ///
    /// * `Some(delay)` - How long to wait before retrying the same page
    /// * `None` - The policy's retry limit is exhausted
    pub fn record_failure(&mut self, policy: &BackoffPolicy) -> Option<Duration> {
        self.count += 1;
        match policy.max_retries {
            Some(limit) if self.count > limit => None,
            _ => Some(policy.delay_for(self.count)),
        }
    }

    /// Clears the counter after a successfully decoded page
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(base_ms: u64, max_ms: u64, max_retries: Option<u32>) -> BackoffPolicy {
        BackoffPolicy {
            base: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            max_retries,
        }
    }

    #[test]
    fn test_linear_delays() {
        let policy = policy(3000, u64::MAX, None);
        let mut retry = RetryState::new();

        let delays: Vec<u128> = (0..3)
            .map(|_| retry.record_failure(&policy).unwrap().as_millis())
            .collect();

        assert_eq!(delays, vec![3000, 6000, 9000]);
        assert_eq!(retry.count(), 3);
    }

    #[test]
    fn test_delays_strictly_increase_until_cap() {
        let policy = policy(1000, 4500, None);
        let delays: Vec<Duration> = (1..=6).map(|n| policy.delay_for(n)).collect();

        assert!(delays[0] < delays[1]);
        assert!(delays[1] < delays[2]);
        assert!(delays[2] < delays[3]);
        assert_eq!(delays[4], Duration::from_millis(4500));
        assert_eq!(delays[5], Duration::from_millis(4500));
    }

    #[test]
    fn test_retry_limit() {
        let policy = policy(10, 1000, Some(2));
        let mut retry = RetryState::new();

        assert!(retry.record_failure(&policy).is_some());
        assert!(retry.record_failure(&policy).is_some());
        assert_eq!(retry.record_failure(&policy), None);
    }

    #[test]
    fn test_reset_restarts_the_sequence() {
        let policy = policy(3000, 60_000, None);
        let mut retry = RetryState::new();
        retry.record_failure(&policy);
        retry.record_failure(&policy);

        retry.reset();

        assert_eq!(retry.count(), 0);
        assert_eq!(retry.record_failure(&policy), Some(Duration::from_millis(3000)));
    }

    #[test]
    fn test_from_config() {
        let config = HarvestConfig::default();
        let policy = BackoffPolicy::from_config(&config);
        assert_eq!(policy.base, Duration::from_millis(3000));
        assert_eq!(policy.max_delay, Duration::from_millis(60_000));
        assert_eq!(policy.max_retries, Some(20));

        let unlimited = HarvestConfig {
            max_retries: 0,
            ..HarvestConfig::default()
        };
        assert_eq!(BackoffPolicy::from_config(&unlimited).max_retries, None);
    }
}
