//! Bounded exponential backoff for retrying idempotent requests.

use std::time::Duration;

/// Tunable parameters for the retry schedule.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between retries.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Iterator over the delays to sleep between attempts.
    ///
    /// Yields `max_attempts - 1` values; an exhausted iterator means the
    /// next failure is final.
    pub fn delays(&self) -> Delays {
        Delays {
            next: self.initial_delay,
            remaining: self.max_attempts.saturating_sub(1),
            max_delay: self.max_delay,
            multiplier: self.multiplier,
        }
    }
}

/// Iterator produced by [`RetryPolicy::delays`].
pub struct Delays {
    next: Duration,
    remaining: u32,
    max_delay: Duration,
    multiplier: f64,
}

impl Iterator for Delays {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        let grown_ms = (current.as_millis() as f64 * self.multiplier) as u64;
        self.next = Duration::from_millis(grown_ms).min(self.max_delay);
        Some(current)
    }
}
