//! Page-by-page retrieval
//!
//! [`PaginatedRetriever`] is a pull-based sequence of pages: nothing is fetched
//! until the consumer asks for the next batch, and at most one page is held at
//! a time.

use crate::adapters::upstream::PageRequest;
use crate::core::cancel::Cancellation;
use crate::core::graph::{normalize, parse};
use crate::core::retry::RetryingFetcher;
use crate::domain::{CandexError, Page, Result, TransportError};
use futures::Stream;

/// Where the retriever is in its walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieverState {
    /// Next call fetches this request
    AwaitingFetch(PageRequest),
    /// The last page has been yielded
    Done,
    /// Cancellation was observed; no more fetches
    Cancelled,
    /// A fetch or validation failed; the error was returned once
    Failed,
}

/// Walks the upstream continuation pointers one page at a time
pub struct PaginatedRetriever {
    fetcher: RetryingFetcher,
    cancel: Cancellation,
    state: RetrieverState,
    pages: usize,
    candidates: usize,
}

impl PaginatedRetriever {
    /// Retriever starting at `first`
    pub fn new(fetcher: RetryingFetcher, first: PageRequest, cancel: Cancellation) -> Self {
        Self {
            fetcher,
            cancel,
            state: RetrieverState::AwaitingFetch(first),
            pages: 0,
            candidates: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &RetrieverState {
        &self.state
    }

    /// Whether the walk stopped because of cancellation
    pub fn was_cancelled(&self) -> bool {
        self.state == RetrieverState::Cancelled
    }

    /// Pages yielded so far
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Candidates seen across yielded pages
    pub fn candidates_seen(&self) -> usize {
        self.candidates
    }

    /// Fetch, validate and flatten the next page
    ///
    /// Returns `Ok(None)` once the walk is over: after the last page, after
    /// cancellation (which is not an error) and after a failure has been
    /// reported.
    ///
    /// # Errors
    ///
    /// Upstream failures surface as [`crate::domain::CandexError::Upstream`],
    /// validation failures as [`crate::domain::CandexError::Schema`]. Either
    /// ends the walk.
    pub async fn next_batch(&mut self) -> Result<Option<Page>> {
        let request = match &self.state {
            RetrieverState::AwaitingFetch(request) => request.clone(),
            _ => return Ok(None),
        };

        if self.cancel.is_cancelled() {
            tracing::debug!("Export cancelled before fetching next page");
            self.state = RetrieverState::Cancelled;
            return Ok(None);
        }

        let response = match self.fetcher.fetch(&request, &self.cancel).await {
            Ok(response) => response,
            Err(TransportError::Cancelled) => {
                tracing::debug!(request = %request, "Export cancelled while fetching page");
                self.state = RetrieverState::Cancelled;
                return Ok(None);
            }
            Err(e) => {
                self.state = RetrieverState::Failed;
                return Err(e.into());
            }
        };

        let validated = match parse(&response.body) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    page = self.pages + 1,
                    issues = e.issues.len(),
                    "Upstream page failed validation"
                );
                self.state = RetrieverState::Failed;
                return Err(e.into());
            }
        };

        let rows = normalize(&validated);
        self.pages += 1;
        self.candidates += validated.candidates.len();

        // An empty pointer ends the walk just like a missing one
        let next_cursor = validated.next.filter(|next| !next.is_empty());

        tracing::debug!(
            page = self.pages,
            candidates = validated.candidates.len(),
            rows = rows.len(),
            has_next = next_cursor.is_some(),
            "Page fetched"
        );

        self.state = match &next_cursor {
            Some(next) => RetrieverState::AwaitingFetch(PageRequest::next(next.clone())),
            None => RetrieverState::Done,
        };

        Ok(Some(Page { rows, next_cursor }))
    }

    /// The remaining pages as a stream
    ///
    /// Dropping the stream mid-fetch abandons the in-flight request.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page>> {
        futures::stream::try_unfold(self, |mut retriever| async move {
            let page = retriever.next_batch().await?;
            Ok::<_, CandexError>(page.map(|page| (page, retriever)))
        })
    }
}
