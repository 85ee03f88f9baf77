use std::time::Duration;

/// Upper bound on retries after a connection failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MaxRetries {
    /// Give up once this many retries have been made.
    Limited(u32),
    /// Retry forever. A permanently unreachable server blocks the caller.
    Unlimited,
}

impl Default for MaxRetries {
    fn default() -> Self {
        Self::Limited(10)
    }
}

impl From<u32> for MaxRetries {
    fn from(value: u32) -> Self {
        Self::Limited(value)
    }
}

/// Attempt counter for one logical request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RetryState {
    attempts: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Records a connection failure and returns how long to wait before the
    /// next attempt, or `None` when the budget is exhausted.
    pub fn next_delay(&mut self, max: MaxRetries, unit: Duration) -> Option<Duration> {
        let allowed = match max {
            MaxRetries::Unlimited => true,
            MaxRetries::Limited(max) => self.attempts < max,
        };
        if !allowed {
            return None;
        }

        self.attempts = self.attempts.saturating_add(1);
        Some(backoff_delay(unit, self.attempts))
    }
}

/// `unit * 2^attempts`, saturating instead of overflowing.
pub fn backoff_delay(unit: Duration, attempts: u32) -> Duration {
    let multiplier = 2u32.saturating_pow(attempts);
    unit.saturating_mul(multiplier)
}
