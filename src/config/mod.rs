//! Configuration management for candex.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! candex uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CANDEX_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use candex::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("candex.toml")?;
//!
//! println!("Upstream: {}", config.upstream.base_url);
//! println!("Page size: {}", config.upstream.page_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`UpstreamConfig`] - Upstream API connection, paging and retries
//! - [`ExportConfig`] - Output destination and shutdown timeout
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [upstream]
//! base_url = "https://api.teamtailor.com/v1"
//! api_key = "${CANDEX_API_KEY}"
//! page_size = 30
//!
//! [upstream.retry]
//! max_retries = 3
//! base_delay_ms = 1000
//!
//! [export]
//! output = "candidates.csv"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CandexConfig, Environment, ExportConfig, LoggingConfig, RetryConfig,
    UpstreamConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
