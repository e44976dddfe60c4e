use std::time::Duration;

use rand::Rng;

/// When to poll again and when to give up.
///
/// The delay after the `n`-th fetch is `interval * backoff_multiplier^(n-1)`,
/// capped at `max_interval` and then spread by `±jitter`. The default is a
/// fixed two-second interval with no cap on attempts or elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub backoff_multiplier: f64,
    pub max_interval: Duration,
    /// Fraction in `[0, 1)`.
    pub jitter: f64,
    pub max_attempts: Option<u32>,
    pub max_elapsed: Option<Duration>,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2_000);

    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff_multiplier: 1.0,
            max_interval: interval,
            jitter: 0.0,
            max_attempts: None,
            max_elapsed: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }

    pub fn with_backoff(mut self, multiplier: f64, max_interval: Duration) -> Self {
        self.backoff_multiplier = multiplier;
        self.max_interval = max_interval;
        self
    }

    /// Non-finite values disable jitter.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = if jitter.is_finite() {
            jitter.clamp(0.0, 0.99)
        } else {
            0.0
        };
        self
    }

    /// Delay before the next fetch, without jitter. `attempt` counts fetches made so far.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if attempt <= 1 || self.backoff_multiplier <= 1.0 {
            return self.interval;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let cap = self.max_interval.max(self.interval).as_secs_f64();
        let scaled = self.interval.as_secs_f64() * self.backoff_multiplier.max(1.0).powi(exponent);
        Duration::from_secs_f64(scaled.min(cap))
    }

    pub fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.base_delay(attempt);
        if !self.jitter.is_finite() || self.jitter <= 0.0 {
            return base;
        }
        let jitter = self.jitter.min(0.99);
        base.mul_f64(rng.random_range(1.0 - jitter..=1.0 + jitter))
    }

    /// Whether another fetch may follow `attempts` non-terminal fetches.
    pub fn allows_retry(&self, attempts: u32, elapsed: Duration) -> bool {
        let within_attempts = self.max_attempts.is_none_or(|max| attempts < max);
        let within_elapsed = self.max_elapsed.is_none_or(|max| elapsed < max);
        within_attempts && within_elapsed
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_interval: Duration::from_millis(30_000),
            ..Self::fixed(Self::DEFAULT_INTERVAL)
        }
    }
}
