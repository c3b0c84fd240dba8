//! Upstream transport trait definition
//!
//! The export core only ever talks to the upstream through [`CandidateSource`],
//! which performs exactly one network call per invocation. Retries, pagination
//! and validation all live above this seam.

use crate::core::cancel::Cancellation;
use crate::domain::TransportError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Target of a single page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// The first page: a path relative to the upstream base URL plus query parameters
    First {
        path: String,
        query: Vec<(String, String)>,
    },

    /// A later page: the upstream-supplied continuation pointer, used verbatim
    Next { url: String },
}

impl PageRequest {
    /// First-page request for the candidates listing
    ///
    /// ```
    /// use candex::adapters::upstream::PageRequest;
    ///
    /// let request = PageRequest::first_page("/candidates", "job-applications", 30);
    /// assert_eq!(request.to_string(), "/candidates?include=job-applications&page[size]=30");
    /// ```
    pub fn first_page(path: impl Into<String>, include: &str, page_size: usize) -> Self {
        PageRequest::First {
            path: path.into(),
            query: vec![
                ("include".to_string(), include.to_string()),
                ("page[size]".to_string(), page_size.to_string()),
            ],
        }
    }

    /// Request for the page behind a continuation pointer
    pub fn next(url: impl Into<String>) -> Self {
        PageRequest::Next { url: url.into() }
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRequest::First { path, query } => {
                write!(f, "{path}")?;
                for (i, (key, value)) in query.iter().enumerate() {
                    let sep = if i == 0 { '?' } else { '&' };
                    write!(f, "{sep}{key}={value}")?;
                }
                Ok(())
            }
            PageRequest::Next { url } => write!(f, "{url}"),
        }
    }
}

/// A successful upstream response
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// Decoded body; a body that was not valid JSON arrives as a JSON string
    pub body: serde_json::Value,

    /// Response headers with lowercase names
    pub headers: HashMap<String, String>,
}

impl UpstreamResponse {
    /// Response with a body and no headers
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            body,
            headers: HashMap::new(),
        }
    }
}

/// Single-shot upstream fetch capability
///
/// Implementations should honor `cancel` by abandoning the in-flight request and
/// returning [`TransportError::Cancelled`]. Callers race the call against the
/// token as well, so an implementation that ignores it is still safe.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetch one page
    ///
    /// # Errors
    ///
    /// - [`TransportError::Status`] when the upstream answered with a non-success status
    /// - [`TransportError::NoResponse`] when no response was received
    /// - [`TransportError::Cancelled`] when `cancel` fired first
    async fn get(
        &self,
        request: &PageRequest,
        cancel: &Cancellation,
    ) -> Result<UpstreamResponse, TransportError>;
}
