//! Domain error types
//!
//! This module defines the error hierarchy for candex. Errors are domain-specific
//! and don't expose third-party HTTP client types.

use thiserror::Error;

/// Main candex error type
///
/// This is the primary error type used throughout the application. Every kind
/// aborts the whole export; see [`CandexError::http_status`] for how each kind
/// maps onto a client-facing outcome.
#[derive(Debug, Error)]
pub enum CandexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream failure after retries were exhausted (or a non-retryable status)
    #[error("Upstream API error: {message}")]
    Upstream {
        /// Last observed HTTP status, `None` when no response was received
        status: Option<u16>,
        /// Human readable reason
        message: String,
    },

    /// Upstream payload did not match the expected resource graph
    #[error("Validation error: {0}")]
    Schema(#[from] SchemaError),

    /// I/O errors (output sink, log directory, config file)
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl CandexError {
    /// HTTP-style status code describing this failure to a client
    ///
    /// Upstream failures carry the last observed status (500 when nothing was
    /// received), schema mismatches are reported as 400.
    pub fn http_status(&self) -> u16 {
        match self {
            CandexError::Upstream { status, .. } => status.unwrap_or(500),
            CandexError::Schema(_) => 400,
            _ => 500,
        }
    }

    /// `"fail"` for client-class (4xx) outcomes, `"error"` otherwise
    pub fn status_class(&self) -> &'static str {
        if (400..500).contains(&self.http_status()) {
            "fail"
        } else {
            "error"
        }
    }
}

/// Errors raised by the upstream transport
///
/// The split between [`TransportError::Status`] and [`TransportError::NoResponse`]
/// drives the retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response (connect failure, timeout, reset)
    #[error("No response from upstream: {message}")]
    NoResponse { message: String },

    /// The upstream answered with a non-success status
    #[error("Upstream responded with status {status}: {message}")]
    Status {
        status: u16,
        /// Raw `Retry-After` header value, if present
        retry_after: Option<String>,
        message: String,
    },

    /// The request was aborted because the export was cancelled
    #[error("Request cancelled")]
    Cancelled,
}

impl TransportError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single structural problem found while validating an upstream page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON path of the offending value, e.g. `data[3].attributes`
    pub path: String,
    /// What was wrong
    pub message: String,
}

impl SchemaIssue {
    /// Creates a new schema issue
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Upstream payload validation failure, listing every issue found on the page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("upstream payload failed validation ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaError {
    /// Creates a schema error from collected issues
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }
}

fn join_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<TransportError> for CandexError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status {
                status, message, ..
            } => CandexError::Upstream {
                status: Some(status),
                message,
            },
            TransportError::NoResponse { message } => CandexError::Upstream {
                status: None,
                message,
            },
            TransportError::Cancelled => CandexError::Other("Export cancelled".to_string()),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CandexError {
    fn from(err: std::io::Error) -> Self {
        CandexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CandexError {
    fn from(err: serde_json::Error) -> Self {
        CandexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CandexError {
    fn from(err: toml::de::Error) -> Self {
        CandexError::Configuration(format!("TOML parse error: {err}"))
    }
}
