//! Retry policy for upstream requests.
//!
//! The policy only targets upstream throttling: a request is retried when the
//! response status is in the retryable set (429 and 403 by default). Transport
//! failures, timeouts and every other status fail on the first attempt.

use std::time::Duration;

use vcat_config::RetryConfig;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// `base` before the first retry, doubling for every retry after it. No cap.
    Exponential { base: Duration },
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(self, retry: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Exponential { base } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                base.saturating_mul(factor)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
    retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Backoff::Exponential {
                base: Duration::from_millis(config.base_delay_ms),
            },
            config.retry_statuses.clone(),
        )
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the initial request and is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Backoff, retry_statuses: Vec<u16>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            retry_statuses,
        }
    }

    /// The default policy without any delay between attempts.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            backoff: Backoff::None,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    #[must_use]
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Whether a response with `status` on attempt `attempt` (1-based) earns
    /// another attempt.
    #[must_use]
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_attempts && self.is_retryable(status)
    }

    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff.delay(retry)
    }
}
