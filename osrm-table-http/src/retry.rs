//! Fixed-delay retry for transport failures.
//!
//! Only transport failures are retried. Service rejections and malformed
//! bodies are decided after the loop, so they never consume attempts.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::warn;

/// Attempts made before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How many times to try and how long to wait in between.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use osrm_table_http::RetryPolicy;
///
/// let policy = RetryPolicy::new(0, Duration::ZERO);
/// assert_eq!(policy.max_attempts(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Result of [`RetryPolicy::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    /// An attempt succeeded.
    Succeeded {
        /// The successful value.
        value: T,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// Every attempt failed.
    Exhausted {
        /// The last failure observed.
        error: E,
        /// Attempts made.
        attempts: u32,
    },
}

impl<T, E> RetryOutcome<T, E> {
    /// Number of attempts made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

impl RetryPolicy {
    /// Build a policy; `max_attempts` is raised to at least one.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            delay,
        }
    }

    /// Attempts made before giving up.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause between attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// `operation` receives the 1-based attempt number. No pause follows the
    /// final failure.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => {
                    return RetryOutcome::Succeeded {
                        value,
                        attempts: attempt,
                    };
                }
                Err(error) if attempt >= self.max_attempts => {
                    return RetryOutcome::Exhausted {
                        error,
                        attempts: attempt,
                    };
                }
                Err(error) => {
                    warn!(
                        "attempt {attempt}/{} failed: {error}; retrying in {:?}",
                        self.max_attempts, self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::future::{Ready, ready};

    fn flaky(
        failures: u32,
        calls: &Cell<u32>,
    ) -> impl FnMut(u32) -> Ready<Result<u32, String>> + '_ {
        move |attempt| {
            calls.set(calls.get() + 1);
            ready(if attempt <= failures {
                Err(format!("failure {attempt}"))
            } else {
                Ok(attempt)
            })
        }
    }

    #[tokio::test]
    async fn succeeds_on_the_last_allowed_attempt() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(10, Duration::ZERO);

        let outcome = policy.run(flaky(9, &calls)).await;

        assert_eq!(
            outcome,
            RetryOutcome::Succeeded {
                value: 10,
                attempts: 10
            }
        );
        assert_eq!(calls.get(), 10);
    }

    #[tokio::test]
    async fn reports_the_last_error_when_exhausted() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(10, Duration::ZERO);

        let outcome = policy.run(flaky(10, &calls)).await;

        assert_eq!(
            outcome,
            RetryOutcome::Exhausted {
                error: "failure 10".to_owned(),
                attempts: 10
            }
        );
        assert_eq!(calls.get(), 10);
    }

    #[tokio::test]
    async fn first_success_is_not_retried() {
        let calls = Cell::new(0);

        let outcome = RetryPolicy::default().run(flaky(0, &calls)).await;

        assert_eq!(outcome.attempts(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn waits_between_attempts() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let started = tokio::time::Instant::now();

        let outcome = policy.run(flaky(5, &calls)).await;

        assert_eq!(outcome.attempts(), 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
