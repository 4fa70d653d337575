//! Bounded retry with exponential backoff.
//!
//! [`with_retry`] runs an async operation up to
//! [`RetryPolicy::max_attempts`] times. Between failed attempts it sleeps on
//! the tokio timer, so a waiting invocation never blocks other tasks. No
//! sleep follows the final attempt.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    /// Three attempts, sleeping 1s then 2s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt `attempt` (0-based):
    /// `initial_delay * multiplier^attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt as i32);
        Duration::from_millis((self.initial_delay.as_millis() as f64 * factor) as u64)
    }
}

/// The operation failed on every attempt.
#[derive(Debug)]
pub struct RetryError<E> {
    /// Number of attempts made.
    pub attempts: u32,
    /// Error returned by the final attempt.
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Run `op` until it succeeds or the policy's attempts are exhausted.
///
/// `op` receives the 0-based attempt number. `label` names the operation in
/// log output.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    operation = label,
                    attempt = attempt + 1,
                    max_attempts,
                    error = %e,
                    "Attempt failed",
                );

                if attempt + 1 >= max_attempts {
                    return Err(RetryError {
                        attempts: attempt + 1,
                        last_error: e,
                    });
                }

                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
