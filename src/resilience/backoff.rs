use std::time::Duration;

/// Capped exponential delays for re-trying the model list after a failed
/// bootstrap. Gives up once `max_attempts` retries have been handed out.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    next: Duration,
    base: Duration,
    cap: Duration,
    attempts: u32,
    max_attempts: u32,
}

impl RetrySchedule {
    #[must_use]
    pub fn new(base: Duration, cap: Duration, max_attempts: u32) -> Self {
        Self {
            next: base,
            base,
            cap,
            attempts: 0,
            max_attempts,
        }
    }

    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        let delay = self.next;
        self.next = self.next.saturating_mul(2).min(self.cap);
        Some(delay)
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reset(&mut self) {
        self.next = self.base;
        self.attempts = 0;
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(60), 6)
    }
}
