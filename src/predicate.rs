//! Retry predicates
//!
//! A predicate decides whether a failure drives the retry loop or bypasses
//! it entirely. Failures rejected by the predicate propagate immediately,
//! unmodified, with no delay and no observer notification.

use std::fmt;

/// A predicate that determines whether an error should be retried
///
/// By default every error is retryable (`AlwaysRetry`). Use a custom
/// predicate to short-circuit retries for known non-recoverable errors.
///
/// # Example
///
/// ```rust
/// use retry_engine::RetryPredicate;
/// use std::io::{Error, ErrorKind};
///
/// struct IoRetryPredicate;
///
/// impl RetryPredicate<Error> for IoRetryPredicate {
///     fn should_retry(&self, error: &Error) -> bool {
///         !matches!(
///             error.kind(),
///             ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
///         )
///     }
/// }
/// ```
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    /// Determine whether the given error should be retried
    fn should_retry(&self, error: &E) -> bool;
}

/// A predicate that always returns true (all errors are retryable)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// A predicate that never retries (no errors are retryable)
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl<E: ?Sized> RetryPredicate<E> for NeverRetry {
    fn should_retry(&self, _error: &E) -> bool {
        false
    }
}

/// A predicate that uses a closure to determine retryability
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    /// Create a new closure-based predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

/// A predicate that retries only on matching error messages
///
/// Patterns are matched case-insensitively against the error's `Display`
/// output; the first matching pattern wins. Membership in the retryable
/// set is decided by the rendered message rather than the error's type.
#[derive(Debug, Clone)]
pub struct MessagePredicate {
    retryable_patterns: Vec<String>,
}

impl MessagePredicate {
    /// Create a new message predicate with the given patterns
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            retryable_patterns: patterns,
        }
    }

    /// Create a predicate for common network errors
    pub fn network_errors() -> Self {
        Self::new(vec![
            "timeout".to_string(),
            "timed out".to_string(),
            "connection reset".to_string(),
            "connection refused".to_string(),
            "network unreachable".to_string(),
            "temporary failure".to_string(),
        ])
    }
}

impl<E: fmt::Display> RetryPredicate<E> for MessagePredicate {
    fn should_retry(&self, error: &E) -> bool {
        let error_msg = error.to_string().to_lowercase();
        self.retryable_patterns
            .iter()
            .any(|pattern| error_msg.contains(&pattern.to_lowercase()))
    }
}
