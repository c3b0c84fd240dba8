//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr (stdout may be carrying CSV)
//! - JSON-formatted local log files with rotation
//! - Configurable log levels
//!
//! # Example
//!
//! ```no_run
//! use candex::logging::init_logging;
//! use candex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export
///
/// # Example
///
/// ```no_run
/// use candex::log_export_start;
///
/// log_export_start!("https://api.teamtailor.com/v1", "candidates.csv");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($upstream:expr, $output:expr) => {
        tracing::info!(
            upstream = %$upstream,
            output = %$output,
            "Starting export"
        );
    };
}

/// Log the completion of an export
///
/// # Example
///
/// ```no_run
/// use candex::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(3, 87, Duration::from_secs(4));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($pages:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            pages = $pages,
            rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use candex::log_error_with_context;
/// use candex::domain::CandexError;
///
/// let error = CandexError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry about to be scheduled
///
/// # Example
///
/// ```no_run
/// use candex::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!(1, 3, Duration::from_millis(740), "status 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_retries:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_retries = $max_retries,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Retrying upstream request after error"
        );
    };
}
