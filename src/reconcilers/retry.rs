// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for remote resource API calls.
//!
//! Errors are classified by matching their rendered message against the
//! policy's retryable pattern. Matching errors are retried with a doubling,
//! capped wait; anything else fails fast. Running out of attempts on a
//! retryable error is **not** an error: [`execute`] returns
//! [`RetryOutcome::Exhausted`] and leaves it to the caller to decide whether
//! that should abort the event.

use crate::constants::{
    BACKOFF_MULTIPLIER, DEFAULT_INITIAL_WAIT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_MAX_WAIT_SECS,
    DEFAULT_RETRYABLE_ERROR_PATTERN,
};
use crate::errors::{ApiError, ProcessingError};
use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

static DEFAULT_RETRYABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_RETRYABLE_ERROR_PATTERN).expect("default retryable pattern must compile")
});

/// Retry budget and classification shared by every remote operation.
///
/// Passed explicitly into each operation; there are no module-level defaults
/// beyond [`RetryPolicy::default`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_wait: Duration,
    max_wait: Duration,
    retryable: Regex,
}

impl RetryPolicy {
    /// Build a validated policy.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::InvalidRetryPolicy`] if `max_retries` is zero,
    /// `max_wait_secs < initial_wait_secs`, or the pattern does not compile.
    pub fn new(
        max_retries: u32,
        initial_wait_secs: u64,
        max_wait_secs: u64,
        retryable_pattern: &str,
    ) -> Result<Self, ProcessingError> {
        if max_retries < 1 {
            return Err(invalid_policy("maxRetries must be at least 1".to_string()));
        }
        if max_wait_secs < initial_wait_secs {
            return Err(invalid_policy(format!(
                "maxWaitSeconds ({max_wait_secs}) must be >= initialWaitSeconds ({initial_wait_secs})"
            )));
        }
        let retryable = Regex::new(retryable_pattern)
            .map_err(|e| invalid_policy(format!("retryableErrorPattern: {e}")))?;

        Ok(Self {
            max_retries,
            initial_wait: Duration::from_secs(initial_wait_secs),
            max_wait: Duration::from_secs(max_wait_secs),
            retryable,
        })
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn initial_wait(&self) -> Duration {
        self.initial_wait
    }

    #[must_use]
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    #[must_use]
    pub fn retryable_pattern(&self) -> &str {
        self.retryable.as_str()
    }

    /// Whether an error's message matches the retryable pattern.
    #[must_use]
    pub fn is_retryable(&self, err: &ApiError) -> bool {
        self.retryable.is_match(&err.to_string())
    }

    /// Fresh backoff schedule starting at the initial wait.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff {
            current_interval: self.initial_wait,
            max_interval: self.max_wait,
        }
    }
}

impl Default for RetryPolicy {
    /// 10 attempts, 2s initial wait, 15s cap, `RetryableError|ReferencedResourceNotProvisioned`.
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_wait: Duration::from_secs(DEFAULT_INITIAL_WAIT_SECS),
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
            retryable: DEFAULT_RETRYABLE_REGEX.clone(),
        }
    }
}

fn invalid_policy(reason: String) -> ProcessingError {
    ProcessingError::InvalidRetryPolicy { reason }
}

/// Doubling backoff capped at a maximum interval.
///
/// With the default policy waits are 2s, 4s, 8s, 15s, 15s, ...
#[derive(Debug, Clone)]
pub struct Backoff {
    current_interval: Duration,
    max_interval: Duration,
}

impl Backoff {
    /// Return the current wait and advance the schedule.
    pub fn next_backoff(&mut self) -> Duration {
        let interval = self.current_interval;
        self.current_interval = interval
            .checked_mul(BACKOFF_MULTIPLIER)
            .map_or(self.max_interval, |next| next.min(self.max_interval));
        interval
    }
}

/// Result of a retried operation that did not fail fatally.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum RetryOutcome<T> {
    /// The operation succeeded
    Completed(T),
    /// Every attempt failed with a retryable error
    Exhausted {
        /// Attempts made (equals the policy's `max_retries`)
        attempts: u32,
        /// The last retryable error
        last_error: ApiError,
    },
}

impl<T> RetryOutcome<T> {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// The value, if the operation completed.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    /// Treat exhaustion as a hard failure for this call.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::RetriesExhausted`] if the budget ran out.
    pub fn into_result(self, operation_name: &str) -> Result<T, ProcessingError> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Exhausted {
                attempts,
                last_error,
            } => Err(ProcessingError::RetriesExhausted {
                operation: operation_name.to_string(),
                attempts,
                last_error,
            }),
        }
    }
}

/// Run a remote operation under the policy's retry discipline.
///
/// # Arguments
///
/// * `policy` - Retry budget and classification pattern
/// * `operation_name` - Human-readable name for logging (e.g., "tag pe-storage")
/// * `operation` - Async closure performing one attempt
///
/// # Returns
///
/// * `Ok(RetryOutcome::Completed(value))` on success
/// * `Ok(RetryOutcome::Exhausted { .. })` after `max_retries` retryable failures
///
/// # Errors
///
/// Returns the first error whose message does not match the retryable
/// pattern, without retrying.
pub async fn execute<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<RetryOutcome<T>, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut backoff = policy.backoff();
    let start_time = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "Remote API call succeeded after retries"
                    );
                } else {
                    debug!(operation = operation_name, "Remote API call succeeded");
                }
                return Ok(RetryOutcome::Completed(value));
            }
            Err(e) => {
                if !policy.is_retryable(&e) {
                    error!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable remote API error, failing immediately"
                    );
                    return Err(e);
                }

                if attempt >= policy.max_retries() {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Retry budget exhausted, giving up"
                    );
                    return Ok(RetryOutcome::Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }

                let duration = backoff.next_backoff();
                warn!(
                    operation = operation_name,
                    attempt = attempt,
                    retry_after = ?duration,
                    error = %e,
                    "Retryable remote API error, will retry"
                );
                tokio::time::sleep(duration).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
