use crate::config::GeminiConfig;
use reqwest::StatusCode;
use std::time::Duration;

/// What a single upstream attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Status(StatusCode),
    Timeout,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    Fail,
}

/// Bounded retry policy for the generation endpoint.
///
/// Only rate limiting (429) and per-attempt timeouts are retried. Every other
/// non-200 status and every other transport failure fails fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff_base: Duration,
    pub timeout_pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(45),
            backoff_base: Duration::from_secs(1),
            timeout_pause: Duration::from_secs(1),
        }
    }
}

impl From<&GeminiConfig> for RetryPolicy {
    fn from(config: &GeminiConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            attempt_timeout: Duration::from_secs(config.timeout_secs),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            timeout_pause: Duration::from_millis(config.timeout_pause_ms),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is zero-based.
    pub fn decide(&self, outcome: AttemptOutcome, attempt: u32) -> RetryDecision {
        let has_next = attempt + 1 < self.max_attempts;
        match outcome {
            AttemptOutcome::Status(StatusCode::TOO_MANY_REQUESTS) if has_next => {
                RetryDecision::RetryAfter(self.backoff(attempt))
            }
            AttemptOutcome::Timeout if has_next => RetryDecision::RetryAfter(self.timeout_pause),
            AttemptOutcome::Status(_) | AttemptOutcome::Timeout | AttemptOutcome::Transport => {
                RetryDecision::Fail
            }
        }
    }

    /// `2^attempt` times the base delay.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}
