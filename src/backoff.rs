//! Backoff schedule
//!
//! The engine uses plain exponential backoff: the delay after the k-th
//! failed attempt is `base_delay * 2^(k - 1)`. There is no jitter and no
//! maximum-delay clamp.

use std::time::Duration;

use crate::policy::RetryPolicy;

/// Calculate the delay to wait after a failed attempt
///
/// `attempt` is the 1-indexed attempt that just failed, so attempt 1 waits
/// the base delay, attempt 2 twice the base delay, and so on. The result
/// saturates at `Duration::MAX` rather than overflowing for pathological
/// attempt counts.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use retry_engine::{delay_for_attempt, RetryPolicy};
///
/// let policy = RetryPolicy::new(5, Duration::from_millis(100));
/// assert_eq!(delay_for_attempt(&policy, 1), Duration::from_millis(100));
/// assert_eq!(delay_for_attempt(&policy, 2), Duration::from_millis(200));
/// assert_eq!(delay_for_attempt(&policy, 3), Duration::from_millis(400));
/// ```
pub fn delay_for_attempt(policy: &RetryPolicy, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let factor = 2u32.saturating_pow(exponent);
    policy.base_delay().saturating_mul(factor)
}
