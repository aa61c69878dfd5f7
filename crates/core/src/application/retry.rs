// Reconnect / commit retry policy
use std::time::Duration;

use crate::application::constants::{
    DEFAULT_COMMIT_ATTEMPTS, DEFAULT_MAX_RECONNECT_INTERVAL, DEFAULT_RECONNECT_INTERVAL,
};

/// Backoff and attempt limits used by the `ConnectionManager`
///
/// Reconnection is unbounded in attempt count; only the delay between
/// attempts is shaped here. Commits get `commit_attempts` tries in total.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    interval: Duration,
    backoff_factor: f64,
    max_interval: Duration,
    commit_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RECONNECT_INTERVAL)
    }
}

impl ReconnectPolicy {
    /// Create a new policy
    ///
    /// # Arguments
    /// * `interval` - Delay after the first failed attempt
    /// * `backoff_factor` - Multiplier applied per further failure (1.0 = fixed)
    /// * `max_interval` - Cap for the delay
    /// * `commit_attempts` - Total commit tries before escalation (at least 1)
    pub fn new(
        interval: Duration,
        backoff_factor: f64,
        max_interval: Duration,
        commit_attempts: u32,
    ) -> Self {
        Self {
            interval,
            backoff_factor,
            max_interval,
            commit_attempts: commit_attempts.max(1),
        }
    }

    /// Fixed delay between attempts, default commit attempts
    pub fn fixed(interval: Duration) -> Self {
        Self::new(
            interval,
            1.0,
            interval.max(DEFAULT_MAX_RECONNECT_INTERVAL),
            DEFAULT_COMMIT_ATTEMPTS,
        )
    }

    pub fn with_commit_attempts(mut self, attempts: u32) -> Self {
        self.commit_attempts = attempts.max(1);
        self
    }

    pub fn commit_attempts(&self) -> u32 {
        self.commit_attempts
    }

    /// Delay to wait after the `attempt`-th consecutive failure (1-based)
    ///
    /// delay = min(interval * backoff_factor ^ (attempt - 1), max_interval)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff_factor <= 1.0 {
            return self.interval.min(self.max_interval);
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.interval.as_secs_f64() * self.backoff_factor.powi(exponent);
        let capped = secs.min(self.max_interval.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(500), Duration::from_secs(2));
    }

    #[test]
    fn test_exponential_delay_is_capped() {
        let policy =
            ReconnectPolicy::new(Duration::from_secs(1), 2.0, Duration::from_secs(5), 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(5));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_commit_attempts_at_least_one() {
        let policy = ReconnectPolicy::default().with_commit_attempts(0);
        assert_eq!(policy.commit_attempts(), 1);
    }
}
