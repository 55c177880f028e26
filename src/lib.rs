//! # retry-engine
//!
//! A policy-based retry execution engine providing:
//! - Exponential backoff between attempts (`base_delay * 2^(k - 1)`)
//! - Configurable retryability predicates; non-matching failures propagate
//!   immediately with no retry and no notification
//! - Observable attempts via the `RetryObserver` trait, with a console
//!   default and a `tracing`-backed structured sink
//! - One algorithm behind two entry points: async (`execute`) and blocking
//!   (`execute_blocking`), with identical semantics
//!
//! # Example
//!
//! ```rust,no_run
//! use retry_engine::{retry_with_policy, RetryError, RetryPolicy};
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     })
//!     .await
//! }
//! ```

mod backoff;
mod error;
mod executor;
mod observer;
mod policy;
mod predicate;

pub use backoff::delay_for_attempt;
pub use error::{PolicyError, RetryError};
pub use executor::{retry_blocking_with_policy, retry_with_policy, RetryExecutor};
pub use observer::{ConsoleObserver, NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use policy::RetryPolicy;
pub use predicate::{AlwaysRetry, ClosurePredicate, MessagePredicate, NeverRetry, RetryPredicate};
