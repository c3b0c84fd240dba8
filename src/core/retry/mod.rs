//! Upstream retry handling
//!
//! - [`policy`] - retryability and backoff decisions
//! - [`fetcher`] - the retry loop around a single page request

pub mod fetcher;
pub mod policy;

pub use fetcher::RetryingFetcher;
pub use policy::{
    delay_before_retry, is_retryable, FixedJitter, Jitter, RandomJitter, RetryPolicy,
};
