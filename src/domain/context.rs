//! Error context extension trait
//!
//! `.context()` / `.with_context()` for `Result<T, CandexError>`, so library
//! code can say which output file or which page failed without giving up the
//! typed error for `anyhow`.
//!
//! ```rust
//! use candex::domain::Result;
//! use candex::domain::context::ResultExt;
//!
//! fn read_output(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::CandexError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context computed only when an error occurs
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

/// Context is prepended to the message; the variant, and therefore the
/// exit code and [`CandexError::http_status`], is kept.
impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CandexError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| add_context(e.into(), &context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let context = f();
            add_context(e.into(), &context)
        })
    }
}

fn add_context(err: CandexError, context: &dyn std::fmt::Display) -> CandexError {
    match err {
        CandexError::Configuration(msg) => CandexError::Configuration(format!("{context}: {msg}")),
        CandexError::Upstream { status, message } => CandexError::Upstream {
            status,
            message: format!("{context}: {message}"),
        },
        // Issue lists are structured; keep them intact
        CandexError::Schema(schema) => CandexError::Schema(schema),
        CandexError::Io(msg) => CandexError::Io(format!("{context}: {msg}")),
        CandexError::Serialization(msg) => CandexError::Serialization(format!("{context}: {msg}")),
        CandexError::Other(msg) => CandexError::Other(format!("{context}: {msg}")),
    }
}
