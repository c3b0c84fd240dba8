//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "candex.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing candex configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set CANDEX_API_KEY (or add it to a .env file)");
                println!("  2. Validate configuration: candex validate-config");
                println!("  3. Run export: candex export --output candidates.csv");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# candex configuration

environment = "production"

[application]
log_level = "info"

[upstream]
base_url = "https://api.teamtailor.com/v1"
api_key = "${CANDEX_API_KEY}"
api_version = "20240404"
page_size = 30

[upstream.retry]
max_retries = 3
base_delay_ms = 1000

[export]
output = "-"
shutdown_timeout_secs = 10

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# candex configuration
#
# Exports every candidate, paired with each of their job applications, from
# the upstream candidates API as CSV.
#
# Values of the form ${VAR} are read from the environment (a .env file in the
# working directory is loaded first). Any setting can also be overridden with
# CANDEX_<SECTION>_<KEY>, e.g. CANDEX_UPSTREAM_PAGE_SIZE=10.

# Runtime environment: development | staging | production
# production requires an https:// base_url
environment = "production"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
# RUST_LOG takes precedence when set
log_level = "info"

# ============================================================================
# Upstream API
# ============================================================================
[upstream]
# Base URL of the API; continuation links are followed verbatim
base_url = "https://api.teamtailor.com/v1"

# API key, sent as "Authorization: Token token=<key>"
api_key = "${CANDEX_API_KEY}"

# Value of the X-Api-Version header
api_version = "20240404"

# Per-request timeout in seconds
timeout_seconds = 30

# Listing path and relationship include for the first page
candidates_path = "/candidates"
include = "job-applications"

# Candidates per page (1-30)
page_size = 30

[upstream.retry]
# Retries after the first attempt (0-10); 429, 5xx and network errors only
max_retries = 3

# Backoff base in milliseconds: delay = random[0,1) * base * 2^attempt
# A 429 with Retry-After: N waits exactly N seconds instead
base_delay_ms = 1000

# ============================================================================
# Export
# ============================================================================
[export]
# Output file, or "-" for stdout
output = "-"

# Seconds to wait for an interrupted export to stop before exiting anyway
shutdown_timeout_secs = 10

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output on stderr
local_enabled = false
local_path = "logs"

# daily or hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CandexConfig;

    fn parse(template: &str) -> CandexConfig {
        let toml = template.replace("${CANDEX_API_KEY}", "test-key");
        toml::from_str(&toml).unwrap()
    }

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "candex.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "candex.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_minimal_config_is_valid() {
        let config = parse(&InitArgs::generate_minimal_config());
        assert!(config.validate().is_ok());
        assert_eq!(config.upstream.page_size, 30);
    }

    #[test]
    fn test_config_with_examples_is_valid() {
        let config = parse(&InitArgs::generate_config_with_examples());
        assert!(config.validate().is_ok());
        assert_eq!(config.upstream.candidates_path, "/candidates");
        assert_eq!(config.upstream.retry.base_delay_ms, 1000);
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = InitArgs {
            output: file.path().to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
    }
}
