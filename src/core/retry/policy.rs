//! Retry decisions
//!
//! Pure functions deciding whether an upstream failure is worth another attempt
//! and how long to wait first.

use crate::config::RetryConfig;
use crate::domain::TransportError;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Source of the jitter factor in `[0, 1)`
pub trait Jitter: Send + Sync {
    /// Next factor; callers rely on it being within `[0, 1]`
    fn sample(&self) -> f64;
}

/// Uniform jitter from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// A constant jitter factor, clamped to `[0, 1]`
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&self) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}

/// Whether another attempt may succeed
///
/// Only "no response", 429 and 5xx are retryable. Cancellation never is.
pub fn is_retryable(error: &TransportError) -> bool {
    match error {
        TransportError::NoResponse { .. } => true,
        TransportError::Status { status, .. } => *status == 429 || (500..600).contains(status),
        TransportError::Cancelled => false,
    }
}

/// Delay before the attempt following `attempt` (0-based)
///
/// A 429 carrying a numeric `Retry-After` of N seconds waits exactly N
/// seconds. Everything else uses full jitter:
/// `round(jitter * base * 2^attempt)`.
pub fn delay_before_retry(
    attempt: u32,
    error: &TransportError,
    base: Duration,
    jitter: &dyn Jitter,
) -> Duration {
    if let TransportError::Status {
        status: 429,
        retry_after: Some(value),
        ..
    } = error
    {
        if let Some(secs) = parse_retry_after(value) {
            return Duration::from_millis((secs * 1000.0).round() as u64);
        }
    }

    let ceiling = base.as_millis() as f64 * 2f64.powi(attempt.min(62) as i32);
    Duration::from_millis((jitter.sample() * ceiling).round() as u64)
}

/// Numeric `Retry-After` seconds; HTTP-date forms are not honored
fn parse_retry_after(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
}

/// Retry settings for one export
#[derive(Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Base of the exponential backoff
    pub base_delay: Duration,

    jitter: Arc<dyn Jitter>,
}

impl RetryPolicy {
    /// Policy with random jitter
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            jitter: Arc::new(RandomJitter),
        }
    }

    /// Policy built from `[upstream.retry]`
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.base_delay_ms),
        )
    }

    /// Replaces the jitter source
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// Total attempts allowed, first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the attempt following `attempt`
    pub fn delay_for(&self, attempt: u32, error: &TransportError) -> Duration {
        delay_before_retry(attempt, error, self.base_delay, self.jitter.as_ref())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn status(status: u16) -> TransportError {
        TransportError::Status {
            status,
            retry_after: None,
            message: String::new(),
        }
    }

    fn too_many(retry_after: &str) -> TransportError {
        TransportError::Status {
            status: 429,
            retry_after: Some(retry_after.to_string()),
            message: "Too Many Requests".to_string(),
        }
    }

    #[test_case(429, true ; "rate limited")]
    #[test_case(500, true ; "internal error")]
    #[test_case(503, true ; "unavailable")]
    #[test_case(599, true ; "upper 5xx")]
    #[test_case(400, false ; "bad request")]
    #[test_case(401, false ; "unauthorized")]
    #[test_case(404, false ; "not found")]
    #[test_case(422, false ; "unprocessable")]
    fn test_status_retryability(code: u16, expected: bool) {
        assert_eq!(is_retryable(&status(code)), expected);
    }

    #[test]
    fn test_no_response_is_retryable() {
        let err = TransportError::NoResponse {
            message: "connection reset".to_string(),
        };
        assert!(is_retryable(&err));
    }

    #[test]
    fn test_cancelled_is_not_retryable() {
        assert!(!is_retryable(&TransportError::Cancelled));
    }

    #[test_case(0 ; "first attempt")]
    #[test_case(4 ; "later attempt")]
    fn test_retry_after_is_exact(attempt: u32) {
        let delay = delay_before_retry(
            attempt,
            &too_many("5"),
            Duration::from_millis(1000),
            &FixedJitter(0.37),
        );
        assert_eq!(delay, Duration::from_millis(5000));
    }

    #[test]
    fn test_fractional_retry_after() {
        let delay = delay_before_retry(
            0,
            &too_many("1.5"),
            Duration::from_millis(1000),
            &FixedJitter(0.0),
        );
        assert_eq!(delay, Duration::from_millis(1500));
    }

    #[test_case("Wed, 21 Oct 2015 07:28:00 GMT" ; "http date")]
    #[test_case("0" ; "zero")]
    #[test_case("-3" ; "negative")]
    fn test_unusable_retry_after_falls_back_to_backoff(value: &str) {
        let delay = delay_before_retry(
            1,
            &too_many(value),
            Duration::from_millis(1000),
            &FixedJitter(1.0),
        );
        assert_eq!(delay, Duration::from_millis(2000));
    }

    #[test_case(0, 1000 ; "attempt zero")]
    #[test_case(1, 2000 ; "attempt one")]
    #[test_case(3, 8000 ; "attempt three")]
    fn test_backoff_ceiling_with_max_jitter(attempt: u32, expected_ms: u64) {
        let delay = delay_before_retry(
            attempt,
            &status(500),
            Duration::from_millis(1000),
            &FixedJitter(1.0),
        );
        assert_eq!(delay, Duration::from_millis(expected_ms));
    }

    #[test]
    fn test_backoff_is_rounded() {
        let delay = delay_before_retry(
            0,
            &status(502),
            Duration::from_millis(1000),
            &FixedJitter(0.4996),
        );
        assert_eq!(delay, Duration::from_millis(500));
    }

    #[test]
    fn test_random_jitter_stays_below_ceiling() {
        let jitter = RandomJitter;
        for _ in 0..200 {
            let delay =
                delay_before_retry(0, &status(500), Duration::from_millis(1000), &jitter);
            assert!(delay <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&RetryConfig {
            max_retries: 2,
            base_delay_ms: 250,
        });
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay, Duration::from_millis(250));

        let policy = policy.with_jitter(FixedJitter(1.0));
        assert_eq!(
            policy.delay_for(2, &status(500)),
            Duration::from_millis(1000)
        );
    }
}
