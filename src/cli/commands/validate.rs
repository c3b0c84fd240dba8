//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the candex configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// [`load_config`] already validates, so a config that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Upstream: {}", config.upstream.base_url);
        println!("  API Version: {}", config.upstream.api_version);
        println!("  API Key: [REDACTED]");
        println!("  Candidates Path: {}", config.upstream.candidates_path);
        println!("  Include: {}", config.upstream.include);
        println!("  Page Size: {}", config.upstream.page_size);
        println!("  Timeout: {}s", config.upstream.timeout_seconds);
        println!(
            "  Retries: {} (base delay {}ms)",
            config.upstream.retry.max_retries, config.upstream.retry.base_delay_ms
        );
        println!(
            "  Output: {}",
            if config.export.writes_to_stdout() {
                "stdout"
            } else {
                config.export.output.as_str()
            }
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!(
                    "{} ({})",
                    config.logging.local_path, config.logging.local_rotation
                )
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\napi_key = \"key\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_two() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\napi_key = \"key\"\npage_size = 100").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
