//! Error types for the retry execution engine
//!
//! `RetryError` is generic over `E`, the error type produced by the
//! operation being retried. `Display` and `Error` are implemented by hand
//! because the derive macros do not compose well with a generic source.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// A retry policy that cannot be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// `max_attempts` was 0, which would mean never invoking the operation
    #[error("max_attempts must be at least 1")]
    ZeroMaxAttempts,
}

/// Errors that can occur during retry execution
#[derive(Debug)]
pub enum RetryError<E> {
    /// All attempts have been exhausted
    ///
    /// Returned when the maximum number of attempts has been reached and
    /// the operation still failed. `source` is the failure from the final
    /// attempt, unless an override error was configured on the executor.
    Exhausted {
        /// Number of attempts made before giving up
        attempts: u32,
        /// The failure surfaced to the caller
        source: E,
        /// Total time spent across all attempts and delays
        total_duration: Duration,
    },

    /// The failure did not match the retry predicate
    ///
    /// Such failures bypass the retry machinery entirely: no delay, no
    /// further attempts, no observer notification.
    NonRetryable(E),

    /// The policy was rejected before the first attempt
    InvalidPolicy(PolicyError),
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                attempts,
                source,
                total_duration,
            } => {
                write!(
                    f,
                    "retry exhausted after {} attempts over {:.2}s: {}",
                    attempts,
                    total_duration.as_secs_f64(),
                    source
                )
            }
            RetryError::NonRetryable(source) => {
                write!(f, "non-retryable error: {}", source)
            }
            RetryError::InvalidPolicy(source) => {
                write!(f, "invalid retry policy: {}", source)
            }
        }
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::NonRetryable(source) => Some(source),
            RetryError::InvalidPolicy(source) => Some(source),
        }
    }
}

impl<E> RetryError<E> {
    /// Create a new exhausted error
    pub fn exhausted(attempts: u32, source: E, total_duration: Duration) -> Self {
        RetryError::Exhausted {
            attempts,
            source,
            total_duration,
        }
    }

    /// Create a new non-retryable error
    pub fn non_retryable(source: E) -> Self {
        RetryError::NonRetryable(source)
    }

    /// Get the number of attempts made
    ///
    /// A non-retryable failure always surfaces on its first occurrence, and
    /// an invalid policy is rejected before any attempt.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::NonRetryable(_) => 1,
            RetryError::InvalidPolicy(_) => 0,
        }
    }

    /// Check if this error indicates all attempts were exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Check if this error is non-retryable
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, RetryError::NonRetryable(_))
    }

    /// Check if this error indicates a rejected policy
    pub fn is_invalid_policy(&self) -> bool {
        matches!(self, RetryError::InvalidPolicy(_))
    }

    /// Get the underlying operation error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::NonRetryable(source) => Some(source),
            RetryError::InvalidPolicy(_) => None,
        }
    }

    /// Get a reference to the underlying operation error
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::NonRetryable(source) => Some(source),
            RetryError::InvalidPolicy(_) => None,
        }
    }

    /// Map the operation error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            RetryError::Exhausted {
                attempts,
                source,
                total_duration,
            } => RetryError::Exhausted {
                attempts,
                source: f(source),
                total_duration,
            },
            RetryError::NonRetryable(source) => RetryError::NonRetryable(f(source)),
            RetryError::InvalidPolicy(source) => RetryError::InvalidPolicy(source),
        }
    }
}
