//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CandexConfig, Environment};
use super::secret_string;
use crate::domain::errors::CandexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CandexConfig`]
/// 4. Applies environment variable overrides (`CANDEX_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`CandexError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use candex::config::loader::load_config;
///
/// let config = load_config("candex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CandexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CandexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CandexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CandexConfig = toml::from_str(&contents)
        .map_err(|e| CandexError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CandexError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CandexError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CandexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Parses a numeric override, naming the variable on failure
fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CandexError::Configuration(format!("Invalid value for {name}: '{value}'"))
    })
}

/// Applies environment variable overrides using the `CANDEX_*` prefix
///
/// Variables follow the pattern `CANDEX_<SECTION>_<KEY>`, for example
/// `CANDEX_UPSTREAM_BASE_URL` or `CANDEX_EXPORT_OUTPUT`.
fn apply_env_overrides(config: &mut CandexConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("CANDEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("CANDEX_ENVIRONMENT") {
        config.environment = match val.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(CandexError::Configuration(format!(
                    "Invalid CANDEX_ENVIRONMENT '{other}'. Must be one of: development, staging, production"
                )))
            }
        };
    }

    // Upstream overrides
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_BASE_URL") {
        config.upstream.base_url = val;
    }
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_API_KEY") {
        config.upstream.api_key = secret_string(val);
    }
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_API_VERSION") {
        config.upstream.api_version = val;
    }
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_TIMEOUT_SECONDS") {
        config.upstream.timeout_seconds = parse_override("CANDEX_UPSTREAM_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_PAGE_SIZE") {
        config.upstream.page_size = parse_override("CANDEX_UPSTREAM_PAGE_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_RETRY_MAX_RETRIES") {
        config.upstream.retry.max_retries =
            parse_override("CANDEX_UPSTREAM_RETRY_MAX_RETRIES", &val)?;
    }
    if let Ok(val) = std::env::var("CANDEX_UPSTREAM_RETRY_BASE_DELAY_MS") {
        config.upstream.retry.base_delay_ms =
            parse_override("CANDEX_UPSTREAM_RETRY_BASE_DELAY_MS", &val)?;
    }

    // Export overrides
    if let Ok(val) = std::env::var("CANDEX_EXPORT_OUTPUT") {
        config.export.output = val;
    }
    if let Ok(val) = std::env::var("CANDEX_EXPORT_SHUTDOWN_TIMEOUT_SECS") {
        config.export.shutdown_timeout_secs =
            parse_override("CANDEX_EXPORT_SHUTDOWN_TIMEOUT_SECS", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CANDEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CANDEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("CANDEX_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CANDEX_LOADER_TEST_VAR", "test_value");
        let input = "api_key = \"${CANDEX_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"\n");
        std::env::remove_var("CANDEX_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CANDEX_LOADER_MISSING_VAR");
        let input = "api_key = \"${CANDEX_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CANDEX_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("CANDEX_LOADER_COMMENTED_VAR");
        let input = "# api_key = \"${CANDEX_LOADER_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${CANDEX_LOADER_COMMENTED_VAR}"));
    }

    #[test]
    fn test_parse_override_reports_variable() {
        let err = parse_override::<u64>("CANDEX_UPSTREAM_PAGE_SIZE", "lots").unwrap_err();
        assert!(err.to_string().contains("CANDEX_UPSTREAM_PAGE_SIZE"));
        assert_eq!(parse_override::<u64>("X", " 12 ").unwrap(), 12);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[upstream]
base_url = "https://api.example.com/v1"
api_key = "key-123"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.upstream.base_url, "https://api.example.com/v1");
        assert_eq!(config.upstream.page_size, 30);
        assert_eq!(config.upstream.retry.max_retries, 3);
        assert!(config.export.writes_to_stdout());
    }
}
