//! Retry execution engine
//!
//! `RetryExecutor` re-invokes a fallible operation according to a
//! `RetryPolicy`, classifying each failure through a `RetryPredicate` and
//! reporting progress through a `RetryObserver`.
//!
//! The executor exposes two entry points over one algorithm: `execute` for
//! async operations (the inter-attempt delay is a cooperative
//! `tokio::time::sleep`) and `execute_blocking` for synchronous operations
//! (the delay is a `std::thread::sleep`). Both share the same
//! failure-classification step, so attempt counts, observer events, and
//! outcomes are identical for the same policy and failure pattern.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::backoff::delay_for_attempt;
use crate::error::RetryError;
use crate::observer::{ConsoleObserver, RetryObserver};
use crate::policy::RetryPolicy;
use crate::predicate::{AlwaysRetry, RetryPredicate};

/// Execute an async operation with retry logic based on a policy
///
/// Convenience wrapper with the default configuration: every failure is
/// retryable, events print to standard output, and exhaustion surfaces the
/// last failure. For more control, build a [`RetryExecutor`].
///
/// # Example
///
/// ```rust,no_run
/// use retry_engine::{retry_with_policy, RetryPolicy};
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///
///     let result = retry_with_policy(&policy, || async {
///         Ok::<_, std::io::Error>("success")
///     })
///     .await;
/// }
/// ```
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: &RetryPolicy,
    op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    RetryExecutor::<E>::new(policy.clone()).execute(op).await
}

/// Execute a blocking operation with retry logic based on a policy
///
/// The synchronous counterpart of [`retry_with_policy`]: the operation runs
/// to completion on the calling thread and the inter-attempt delay blocks
/// that thread.
pub fn retry_blocking_with_policy<F, T, E>(
    policy: &RetryPolicy,
    op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
{
    RetryExecutor::<E>::new(policy.clone()).execute_blocking(op)
}

/// What to do after a retryable-or-not failure has been classified
enum Disposition {
    /// Wait, then run the next attempt
    Retry(Duration),
    /// That was the final attempt
    Exhausted,
    /// The failure bypasses the retry machinery
    Propagate,
}

/// A retry executor with configurable policy, predicate, observer, and
/// exhaustion override
///
/// # Example
///
/// ```rust,no_run
/// use retry_engine::{ClosurePredicate, RetryExecutor, RetryPolicy, TracingObserver};
///
/// async fn example() {
///     let executor = RetryExecutor::new(RetryPolicy::default())
///         .with_predicate(ClosurePredicate::new(|err: &std::io::Error| {
///             err.kind() == std::io::ErrorKind::TimedOut
///         }))
///         .with_observer(TracingObserver::new("download"));
///
///     let result = executor
///         .execute(|| async { Ok::<_, std::io::Error>("payload") })
///         .await;
/// }
/// ```
///
/// # Cancellation
///
/// Dropping the future returned by `execute` — mid-attempt or during a
/// delay — cancels the whole invocation. Cancellation is never routed
/// through the predicate or reported to the observer.
pub struct RetryExecutor<E, P = AlwaysRetry, O = ConsoleObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    override_error: Option<Box<dyn Fn() -> E + Send + Sync>>,
}

impl<E> RetryExecutor<E, AlwaysRetry, ConsoleObserver> {
    /// Create an executor with default settings: retry every failure and
    /// print events to standard output
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            predicate: AlwaysRetry,
            observer: ConsoleObserver,
            override_error: None,
        }
    }
}

impl<E, P, O> RetryExecutor<E, P, O> {
    /// Set the retry predicate
    ///
    /// The predicate determines whether an error drives the retry loop or
    /// propagates immediately.
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutor<E, P2, O> {
        RetryExecutor {
            policy: self.policy,
            predicate,
            observer: self.observer,
            override_error: self.override_error,
        }
    }

    /// Set the observer
    ///
    /// The observer receives callbacks during retry execution.
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutor<E, P, O2> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer,
            override_error: self.override_error,
        }
    }

    /// Replace the failure surfaced at exhaustion
    ///
    /// When configured, the error produced by `make` is returned instead of
    /// the final attempt's failure once every attempt has been used up. A
    /// factory rather than a value because common error types (such as
    /// `std::io::Error`) are not `Clone`.
    pub fn with_override_error<F>(mut self, make: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.override_error = Some(Box::new(make));
        self
    }

    /// The policy this executor runs under
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<E, P, O> RetryExecutor<E, P, O>
where
    P: RetryPredicate<E>,
    O: RetryObserver<E>,
{
    /// Execute an async operation with retry logic
    ///
    /// Returns the first successful result, or a `RetryError` once the
    /// failure is classified as non-retryable or the attempt budget is
    /// exhausted.
    pub async fn execute<F, Fut, T>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.policy.validate().map_err(RetryError::InvalidPolicy)?;

        let started = Instant::now();
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(self.succeeded(attempt, value)),
                Err(err) => match self.classify_failure(attempt, &err) {
                    Disposition::Propagate => return Err(RetryError::non_retryable(err)),
                    Disposition::Exhausted => return Err(self.exhausted(err, started)),
                    Disposition::Retry(delay) => {
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// Execute a blocking operation with retry logic
    ///
    /// Identical semantics to [`execute`](Self::execute); the operation
    /// runs on the calling thread and the delay blocks it.
    pub fn execute_blocking<F, T>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.policy.validate().map_err(RetryError::InvalidPolicy)?;

        let started = Instant::now();
        let mut attempt = 1u32;
        loop {
            match op() {
                Ok(value) => return Ok(self.succeeded(attempt, value)),
                Err(err) => match self.classify_failure(attempt, &err) {
                    Disposition::Propagate => return Err(RetryError::non_retryable(err)),
                    Disposition::Exhausted => return Err(self.exhausted(err, started)),
                    Disposition::Retry(delay) => {
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// The single classification step both entry points share
    ///
    /// Notifies the observer for retryable failures (every one, including
    /// the final attempt's) and for exhaustion; non-retryable failures
    /// produce no notification at all.
    fn classify_failure(&self, attempt: u32, error: &E) -> Disposition {
        if !self.predicate.should_retry(error) {
            return Disposition::Propagate;
        }

        self.observer.on_attempt_failed(attempt, error);

        if attempt >= self.policy.max_attempts {
            self.observer
                .on_all_attempts_failed(self.policy.max_attempts, error);
            return Disposition::Exhausted;
        }

        Disposition::Retry(delay_for_attempt(&self.policy, attempt))
    }

    fn succeeded<T>(&self, attempt: u32, value: T) -> T {
        if attempt > 1 {
            self.observer.on_success_after_retry(attempt);
        }
        value
    }

    fn exhausted(&self, last_error: E, started: Instant) -> RetryError<E> {
        let source = match &self.override_error {
            Some(make) => make(),
            None => last_error,
        };
        RetryError::exhausted(self.policy.max_attempts, source, started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::StatsObserver;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, RetryError<io::Error>> = RetryExecutor::new(quick_policy(3))
            .with_observer(observer.clone())
            .execute(|| async { Ok("success") })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(observer.failures(), 0);
        assert_eq!(observer.retry_successes(), 0);
    }

    #[tokio::test]
    async fn test_retry_with_policy_convenience() {
        let policy = quick_policy(3);
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = retry_with_policy(&policy, || {
            let attempts = attempts_clone.clone();
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 2 {
                    Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_retry_blocking_with_policy_convenience() {
        let policy = quick_policy(3);
        let calls = AtomicU32::new(0);

        let result = retry_blocking_with_policy(&policy, || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < 2 {
                Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
            } else {
                Ok("success")
            }
        });

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_max_attempts_rejected_eagerly() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<&str, RetryError<io::Error>> = retry_with_policy(&policy, || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(io::Error::other("error"))
            }
        })
        .await;

        assert!(result.unwrap_err().is_invalid_policy());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_override_error_replaces_last_failure() {
        let result: Result<&str, RetryError<io::Error>> = RetryExecutor::new(quick_policy(2))
            .with_observer(StatsObserver::new())
            .with_override_error(|| io::Error::other("service unavailable, giving up"))
            .execute(|| async { Err(io::Error::new(io::ErrorKind::TimedOut, "timeout")) })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(
            err.source_ref().unwrap().to_string(),
            "service unavailable, giving up"
        );
    }
}
