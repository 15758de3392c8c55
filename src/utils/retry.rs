//! Bounded retries with linear backoff around outbound calls.
//!
//! Attempt `n` (zero-based) is preceded by a sleep of `n * step`, so the
//! first attempt never waits and `k` failing attempts sleep
//! `step * (0 + 1 + ... + (k - 1))` in total. Each call's retry state is
//! independent; there is no shared failure budget.
//!
//! Remote 5xx, 408 and 429 responses are transient under every policy; any
//! other status fails on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::NetworkError;
use crate::models::RetryConfig;

/// How a single outbound call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Linear backoff step
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Policy for API, metadata and thumbnail calls.
    pub fn generic(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.api_attempts.max(1),
            backoff_step: Duration::from_secs(config.backoff_step_secs),
        }
    }

    /// Policy for rendered-page fetches.
    pub fn content(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.render_attempts.max(1),
            backoff_step: Duration::from_secs(config.backoff_step_secs),
        }
    }

    /// Whether `error` belongs to the retryable set under this policy.
    pub fn is_retryable(&self, error: &NetworkError) -> bool {
        match error {
            NetworkError::Timeout(_)
            | NetworkError::Connect(_)
            | NetworkError::Malformed(_)
            | NetworkError::Transport(_) => true,
            NetworkError::Status { code } => *code >= 500 || *code == 408 || *code == 429,
            NetworkError::Request(_) => false,
        }
    }

    /// Sleep before the zero-based attempt `attempt`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, NetworkError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NetworkError>>,
    {
        let mut attempt = 0;
        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || !self.is_retryable(&error) {
                        return Err(error);
                    }
                    log::debug!(
                        "{} failed ({}/{}): {}; retrying",
                        label,
                        attempt,
                        self.max_attempts,
                        error
                    );
                }
            }
        }
    }
}
