//! Configuration schema types
//!
//! This module defines the configuration structure for candex.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main candex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Upstream API configuration
    pub upstream: UpstreamConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CandexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.upstream.validate(&self.environment)?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for upstream calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; total attempts = max_retries + 1
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff with full jitter
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "upstream.retry.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }

        if self.base_delay_ms > 60_000 {
            return Err(format!(
                "upstream.retry.base_delay_ms must be <= 60000, got {}",
                self.base_delay_ms
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `Authorization: Token token=<key>`
    /// Stored securely in memory and automatically zeroized on drop
    pub api_key: SecretString,

    /// Value of the `X-Api-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Path of the candidates listing, relative to `base_url`
    #[serde(default = "default_candidates_path")]
    pub candidates_path: String,

    /// Relationship include directive for the first request
    #[serde(default = "default_include")]
    pub include: String,

    /// Page size requested on the first request
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl UpstreamConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("upstream.base_url cannot be empty".to_string());
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("upstream.base_url is not a valid URL: {e}"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("upstream.base_url must start with http:// or https://".to_string());
        }

        if *environment == Environment::Production && parsed.scheme() != "https" {
            return Err(
                "upstream.base_url must use https:// in production environments".to_string(),
            );
        }

        if self.api_key.expose_secret().is_empty() {
            return Err("upstream.api_key cannot be empty".to_string());
        }

        if self.api_version.is_empty() {
            return Err("upstream.api_version cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("upstream.timeout_seconds must be > 0".to_string());
        }

        if !self.candidates_path.starts_with('/') {
            return Err(format!(
                "upstream.candidates_path must start with '/', got '{}'",
                self.candidates_path
            ));
        }

        if !(1..=30).contains(&self.page_size) {
            return Err(format!(
                "upstream.page_size must be between 1 and 30, got {}",
                self.page_size
            ));
        }

        self.retry.validate()?;
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output destination: a file path, or "-" for stdout
    #[serde(default = "default_output")]
    pub output: String,

    /// Graceful shutdown timeout in seconds
    /// Maximum time to wait for an interrupted export to wind down before
    /// the process exits anyway.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output.trim().is_empty() {
            return Err("export.output cannot be empty (use \"-\" for stdout)".to_string());
        }
        Ok(())
    }

    /// Whether output goes to stdout
    pub fn writes_to_stdout(&self) -> bool {
        self.output == "-"
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://api.teamtailor.com/v1".to_string()
}

fn default_api_version() -> String {
    "20240404".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_candidates_path() -> String {
    "/candidates".to_string()
}

fn default_include() -> String {
    "job-applications".to_string()
}

fn default_page_size() -> usize {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_output() -> String {
    "-".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
