//! Retry policy configuration
//!
//! A `RetryPolicy` is an immutable description of how many attempts an
//! operation gets and how long to wait between them. It is created once per
//! wrapped operation and never mutated afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Retry policy for an operation
///
/// The wait before attempt `k + 1` is `base_delay * 2^(k - 1)`: the first
/// retry waits the base delay, the second twice that, the third four times,
/// and so on. No jitter is applied and the delay is not capped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (must be at least 1)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay in milliseconds for the exponential backoff schedule
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and base delay
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay_ms: base_delay.as_millis() as u64,
        }
    }

    /// The base delay as a `Duration`
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Check that the policy describes at least one attempt
    ///
    /// A zero attempt budget would mean the operation is never invoked and
    /// no failure is ever recorded, so it is rejected before the first
    /// attempt rather than silently producing nothing.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_attempts == 0 {
            return Err(PolicyError::ZeroMaxAttempts);
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 1000);
        assert_eq!(policy.base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_new_converts_duration() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 250);
    }

    #[test]
    fn test_validate_accepts_single_attempt() {
        assert!(RetryPolicy::new(1, Duration::ZERO).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let err = RetryPolicy::new(0, Duration::from_secs(1))
            .validate()
            .unwrap_err();
        assert_eq!(err, PolicyError::ZeroMaxAttempts);
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_deserialize_kebab_case_fields() {
        let policy: RetryPolicy =
            serde_json::from_str(r#"{"max-attempts": 5, "base-delay-ms": 100}"#).unwrap();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 100);
    }
}
