//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for monitoring retry
//! attempts, the default `ConsoleObserver` that prints to standard output,
//! and a `TracingObserver` that logs through the `tracing` crate.
//!
//! Observers are pure reporting: nothing they do can affect the retry
//! control flow.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Observer trait for retry attempt events
///
/// The trait is generic over `E`, the failure type of the operation being
/// retried, so observers can report the concrete failure rather than an
/// erased trait object.
///
/// Two events the engine deliberately never reports: non-retryable failures
/// (they bypass the retry machinery entirely) and first-attempt successes
/// (nothing was retried).
pub trait RetryObserver<E: ?Sized>: Send + Sync {
    /// Called when an attempt fails with a retryable error
    ///
    /// Fires for every failed attempt, including the final one before
    /// exhaustion. `attempt` is 1-indexed.
    fn on_attempt_failed(&self, attempt: u32, error: &E);

    /// Called once when every attempt has failed
    fn on_all_attempts_failed(&self, max_attempts: u32, error: &E);

    /// Called when the operation succeeds on attempt 2 or later
    fn on_success_after_retry(&self, attempt: u32);
}

/// The final path segment of a type name, analogous to an exception
/// class name
fn short_type_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}

fn attempt_failed_line<E: fmt::Display + ?Sized>(attempt: u32, error: &E) -> String {
    format!(
        "[retry] Attempt {} failed: {}({})",
        attempt,
        short_type_name::<E>(),
        error
    )
}

fn all_failed_line(max_attempts: u32) -> String {
    format!("[retry] All {} attempts failed", max_attempts)
}

fn success_line(attempt: u32) -> String {
    format!("[retry] Succeeded after {} attempts", attempt)
}

/// The default observer: prints each event to standard output
///
/// Line formats:
///
/// ```text
/// [retry] Attempt {n} failed: {Kind}({message})
/// [retry] All {tries} attempts failed
/// [retry] Succeeded after {n} attempts
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl<E: fmt::Display + ?Sized> RetryObserver<E> for ConsoleObserver {
    fn on_attempt_failed(&self, attempt: u32, error: &E) {
        println!("{}", attempt_failed_line(attempt, error));
    }

    fn on_all_attempts_failed(&self, max_attempts: u32, _error: &E) {
        println!("{}", all_failed_line(max_attempts));
    }

    fn on_success_after_retry(&self, attempt: u32) {
        println!("{}", success_line(attempt));
    }
}

/// A no-op observer that discards every event
///
/// Use this to fully suppress per-attempt output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<E: ?Sized> RetryObserver<E> for NoOpObserver {
    fn on_attempt_failed(&self, _attempt: u32, _error: &E) {}

    fn on_all_attempts_failed(&self, _max_attempts: u32, _error: &E) {}

    fn on_success_after_retry(&self, _attempt: u32) {}
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log levels
///
/// - `on_attempt_failed`: WARN
/// - `on_all_attempts_failed`: ERROR
/// - `on_success_after_retry`: INFO
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    ///
    /// `operation` is a descriptive name for the operation being retried.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl<E: fmt::Display + ?Sized> RetryObserver<E> for TracingObserver {
    fn on_attempt_failed(&self, attempt: u32, error: &E) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "attempt failed"
        );
    }

    fn on_all_attempts_failed(&self, max_attempts: u32, error: &E) {
        tracing::error!(
            operation = %self.operation,
            max_attempts = max_attempts,
            error = %error,
            "all retry attempts failed"
        );
    }

    fn on_success_after_retry(&self, attempt: u32) {
        tracing::info!(
            operation = %self.operation,
            attempt = attempt,
            "succeeded after retry"
        );
    }
}

/// An observer that counts events, for tests and metrics collection
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Failed attempt events
    pub failures: AtomicU32,
    /// Exhaustion events
    pub exhaustions: AtomicU32,
    /// Success-after-retry events
    pub retry_successes: AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of failed attempts observed
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Get the number of exhaustion events observed
    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    /// Get the number of success-after-retry events observed
    pub fn retry_successes(&self) -> u32 {
        self.retry_successes.load(Ordering::SeqCst)
    }
}

impl<E: ?Sized> RetryObserver<E> for StatsObserver {
    fn on_attempt_failed(&self, _attempt: u32, _error: &E) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_all_attempts_failed(&self, _max_attempts: u32, _error: &E) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success_after_retry(&self, _attempt: u32) {
        self.retry_successes.fetch_add(1, Ordering::SeqCst);
    }
}

impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for std::sync::Arc<T> {
    fn on_attempt_failed(&self, attempt: u32, error: &E) {
        (**self).on_attempt_failed(attempt, error)
    }

    fn on_all_attempts_failed(&self, max_attempts: u32, error: &E) {
        (**self).on_all_attempts_failed(max_attempts, error)
    }

    fn on_success_after_retry(&self, attempt: u32) {
        (**self).on_success_after_retry(attempt)
    }
}

impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for Box<T> {
    fn on_attempt_failed(&self, attempt: u32, error: &E) {
        (**self).on_attempt_failed(attempt, error)
    }

    fn on_all_attempts_failed(&self, max_attempts: u32, error: &E) {
        (**self).on_all_attempts_failed(max_attempts, error)
    }

    fn on_success_after_retry(&self, attempt: u32) {
        (**self).on_success_after_retry(attempt)
    }
}
