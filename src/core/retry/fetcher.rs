//! Retrying single-page fetch

use super::policy::{is_retryable, RetryPolicy};
use crate::adapters::upstream::{CandidateSource, PageRequest, UpstreamResponse};
use crate::core::cancel::Cancellation;
use crate::domain::TransportError;
use std::sync::Arc;

/// Wraps a [`CandidateSource`] with the retry loop
///
/// Each export owns its fetcher; nothing is shared between exports except the
/// source itself.
#[derive(Clone)]
pub struct RetryingFetcher {
    source: Arc<dyn CandidateSource>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    /// Create a fetcher
    pub fn new(source: Arc<dyn CandidateSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Retry policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch one page, retrying transient failures
    ///
    /// At most `max_retries + 1` calls reach the source. The first
    /// non-retryable error, or the last error once attempts run out, is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Cancelled`] as soon as `cancel` fires: before
    /// an attempt, during an in-flight call, or during a retry delay. A
    /// cancellation observed after a failed attempt takes precedence over
    /// that attempt's error.
    pub async fn fetch(
        &self,
        request: &PageRequest,
        cancel: &Cancellation,
    ) -> Result<UpstreamResponse, TransportError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(TransportError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                result = self.source.get(request, cancel) => result,
            };

            let error = match outcome {
                Ok(response) => return Ok(response),
                Err(TransportError::Cancelled) => return Err(TransportError::Cancelled),
                Err(error) => error,
            };

            if cancel.is_cancelled() {
                return Err(TransportError::Cancelled);
            }

            if !is_retryable(&error) || attempt >= self.policy.max_retries {
                return Err(error);
            }

            let delay = self.policy.delay_for(attempt, &error);
            crate::log_retry_attempt!(
                attempt + 1,
                self.policy.max_retries,
                delay,
                error.to_string()
            );

            if cancel.sleep(delay).await.is_err() {
                return Err(TransportError::Cancelled);
            }

            attempt += 1;
        }
    }
}
