//! Result type alias for candex
//!
//! This module provides a convenient Result type alias that uses CandexError
//! as the error type.

use super::errors::CandexError;

/// Result type alias for candex operations
///
/// # Examples
///
/// ```
/// use candex::domain::result::Result;
/// use candex::domain::errors::CandexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CandexError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CandexError>;
