//! Timeout and backoff around store writes.

use std::{future::Future, time::Duration};

use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum RetryError {
    #[error("timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Per-attempt timeout with capped exponential backoff between attempts.
///
/// Only timeouts and transient store errors are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempt_timeout: Duration,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(10),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// One attempt, no retries.
    #[must_use]
    pub const fn single_attempt(attempt_timeout: Duration) -> Self {
        Self {
            attempt_timeout,
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));

        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `call` until it succeeds, fails permanently or runs out of attempts.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::TimedOut`] when the last attempt timed out, or
    /// the last [`GatewayError`] otherwise.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match timeout(self.attempt_timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(error)) if !error.is_transient() => return Err(error.into()),
                Ok(Err(error)) => {
                    warn!(operation, attempt, "attempt failed: {error}");

                    RetryError::Gateway(error)
                }
                Err(_elapsed) => {
                    warn!(operation, attempt, "attempt timed out");

                    RetryError::TimedOut { attempts: attempt }
                }
            };

            if attempt >= max_attempts {
                return Err(failure);
            }

            sleep(self.backoff_after(attempt)).await;
        }
    }
}
