use std::time::Duration;

/// Retry delays and the escalation threshold for one download task.
///
/// The delay after failed attempt `n` (1-based) is
/// `min(base_delay * multiplier^(n-1), max_delay)`, floored to whole
/// milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// Consecutive failures before the operator is asked what to do.
    pub escalation_threshold: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(5_000),
            multiplier: 1.5,
            max_delay: Duration::from_millis(30_000),
            escalation_threshold: 10,
        }
    }
}

impl RetryPolicy {
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.max(1.0).powi(exponent.min(i32::MAX as u32) as i32);
        let cap_ms = self.max_delay.as_millis() as f64;
        let delay_ms = (self.base_delay.as_millis() as f64 * factor).min(cap_ms);
        if !delay_ms.is_finite() {
            return self.max_delay;
        }
        Duration::from_millis(delay_ms.floor() as u64)
    }

    pub fn should_escalate(&self, consecutive_failures: u32) -> bool {
        self.escalation_threshold > 0 && consecutive_failures >= self.escalation_threshold
    }
}
