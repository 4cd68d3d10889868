use crate::error::StreamError;
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::warn;

/// Whether an error should be retried or treated as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    Retry,
    Stop,
}

/// Result of running an operation under the retry policy.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The error was fatal and bubbles up immediately.
    Fatal(E),
    /// The error was retryable, but the configured attempts were exhausted.
    AttemptsExceeded(E),
}

/// Exponential-backoff policy for wrapping whole stream operations.
///
/// The streaming core never retries on its own; a failed stream must be
/// restarted from scratch, so the retry unit is the full operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: if max_delay.is_zero() {
                base_delay
            } else {
                max_delay
            },
        }
    }

    /// Runs `op` until it succeeds, `classify` marks an error fatal, or the
    /// attempts are exhausted.
    pub async fn run<F, Fut, T, E, Classifier>(
        &self,
        mut op: F,
        classify: Classifier,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        Classifier: Fn(&E) -> RetryDisposition,
    {
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if classify(&err) == RetryDisposition::Stop => {
                    return Err(RetryError::Fatal(err));
                }
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryError::AttemptsExceeded(err));
                    }

                    let delay = self.delay_for(attempt);
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "retryable failure: {err}");
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }

        let exp = (attempt - 1).min(6) as u32;
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }
}

/// Classifier for stream operations: only transient source failures are
/// retried; invalid arguments and predicate failures are fatal.
pub fn classify_stream_error(err: &StreamError) -> RetryDisposition {
    match err {
        StreamError::Source(db) if db.is_transient() => RetryDisposition::Retry,
        _ => RetryDisposition::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn policy(max_attempts: usize) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result = policy(3)
            .run(
                move || {
                    let counter = counter.clone();
                    async move {
                        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                            Err("transient")
                        } else {
                            Ok(42)
                        }
                    }
                },
                |_| RetryDisposition::Retry,
            )
            .await;

        assert!(matches!(result, Ok(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_error_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = policy(5)
            .run(
                move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err("bad config")
                    }
                },
                |_| RetryDisposition::Stop,
            )
            .await;

        assert!(matches!(result, Err(RetryError::Fatal(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_attempts_report_last_error() {
        let result: Result<(), _> = policy(2)
            .run(
                || async { Err("still down") },
                |_| RetryDisposition::Retry,
            )
            .await;

        assert!(matches!(result, Err(RetryError::AttemptsExceeded(_))));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(
            5,
            Duration::from_millis(100),
            Duration::from_millis(300),
        );
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(300));
        assert_eq!(policy.delay_for(4), Duration::from_millis(300));
    }
}
