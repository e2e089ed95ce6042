//! Bounded retries with a fixed delay.

use crate::error::{Error, ParameterError, Result};
use std::future::Future;
use std::time::Duration;

/// Retries an operation while its error is retryable, waiting a fixed delay between attempts.
/// Errors where Steam understood and rejected the request are returned after the first attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Must be more than 0.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
    /// Decides whether an error is worth another attempt.
    pub is_retryable: fn(&Error) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// A policy retrying transport and parse errors.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            is_retryable: Error::is_retryable,
        }
    }

    /// Replaces the predicate deciding which errors are retried.
    pub fn with_predicate(mut self, is_retryable: fn(&Error) -> bool) -> Self {
        self.is_retryable = is_retryable;
        self
    }

    /// Runs `operation` until it succeeds, fails with an error that is not retryable, or runs out
    /// of attempts. Fails with [`ParameterError::InvalidRetryCount`] without running the
    /// operation when `max_attempts` is 0.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.max_attempts == 0 {
            return Err(ParameterError::InvalidRetryCount.into());
        }

        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !(self.is_retryable)(&error) || attempt >= self.max_attempts {
                        return Err(error);
                    }

                    log::warn!(
                        "Attempt {attempt}/{} failed, retrying in {:?}: {error}",
                        self.max_attempts,
                        self.delay,
                    );

                    async_std::task::sleep(self.delay).await;
                }
            }
        }
    }
}
