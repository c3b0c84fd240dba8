//! Teamtailor HTTP client
//!
//! The reqwest-backed [`CandidateSource`]. It performs exactly one request per
//! call and classifies the outcome; retrying is the fetcher's job.

use super::source::{CandidateSource, PageRequest, UpstreamResponse};
use crate::config::UpstreamConfig;
use crate::core::cancel::Cancellation;
use crate::domain::{CandexError, Result, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;

/// Media type of JSON:API documents
const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Longest error body excerpt carried into a [`TransportError`]
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Upstream client for the Teamtailor candidates API
///
/// # Example
///
/// ```no_run
/// use candex::adapters::upstream::TeamtailorClient;
/// use candex::config::load_config;
///
/// # fn example() -> candex::domain::Result<()> {
/// let config = load_config("candex.toml")?;
/// let client = TeamtailorClient::new(&config.upstream)?;
/// # Ok(())
/// # }
/// ```
pub struct TeamtailorClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client carrying the auth and versioning headers
    client: Client,
}

impl TeamtailorClient {
    /// Create a client from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns [`CandexError::Configuration`] if the API key or version is not a
    /// valid header value, or if the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!(
            "Token token={}",
            config.api_key.expose_secret().as_ref()
        ))
        .map_err(|_| {
            CandexError::Configuration("upstream.api_key is not a valid header value".to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        headers.insert(
            "x-api-version",
            HeaderValue::from_str(&config.api_version).map_err(|_| {
                CandexError::Configuration(
                    "upstream.api_version is not a valid header value".to_string(),
                )
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| {
                CandexError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Absolute URL for a continuation pointer
    ///
    /// Absolute pointers are used verbatim; relative ones are resolved against
    /// the base URL.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    async fn send(
        &self,
        request: &PageRequest,
    ) -> std::result::Result<UpstreamResponse, TransportError> {
        let builder = match request {
            PageRequest::First { path, query } => self
                .client
                .get(format!("{}{}", self.base_url, path))
                .query(query),
            PageRequest::Next { url } => self.client.get(self.resolve(url)),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::NoResponse {
                message: e.to_string(),
            })?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        if !status.is_success() {
            let retry_after = headers.get("retry-after").cloned();
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.to_string()
            } else {
                format!("{status}: {}", truncate(&body, MAX_ERROR_BODY_CHARS))
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                retry_after,
                message,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::NoResponse {
                message: format!("Failed to read response body: {e}"),
            })?;

        // Anything that isn't JSON is left for the parser to reject
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Ok(UpstreamResponse { body, headers })
    }
}

#[async_trait]
impl CandidateSource for TeamtailorClient {
    async fn get(
        &self,
        request: &PageRequest,
        cancel: &Cancellation,
    ) -> std::result::Result<UpstreamResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        tracing::debug!(request = %request, "Requesting upstream page");

        // Dropping the send future aborts the in-flight request
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.send(request) => result,
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, RetryConfig};

    fn config(base_url: &str) -> UpstreamConfig {
        UpstreamConfig {
            base_url: base_url.to_string(),
            api_key: secret_string("test-key".to_string()),
            api_version: "20240404".to_string(),
            timeout_seconds: 5,
            candidates_path: "/candidates".to_string(),
            include: "job-applications".to_string(),
            page_size: 30,
            retry: RetryConfig::default(),
        }
    }

    #[test]
    fn test_resolve_absolute_url_verbatim() {
        let client = TeamtailorClient::new(&config("https://api.example.com/v1/")).unwrap();
        let next = "https://api.example.com/v1/candidates?page%5Bafter%5D=x";
        assert_eq!(client.resolve(next), next);
    }

    #[test]
    fn test_resolve_relative_url() {
        let client = TeamtailorClient::new(&config("https://api.example.com/v1")).unwrap();
        assert_eq!(
            client.resolve("/candidates?page=2"),
            "https://api.example.com/v1/candidates?page=2"
        );
        assert_eq!(
            client.resolve("candidates?page=2"),
            "https://api.example.com/v1/candidates?page=2"
        );
    }

    #[test]
    fn test_invalid_api_key_header() {
        let mut config = config("https://api.example.com/v1");
        config.api_key = secret_string("bad\nkey".to_string());
        assert!(matches!(
            TeamtailorClient::new(&config),
            Err(CandexError::Configuration(_))
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("żółw", 2), "żó...");
    }

    #[tokio::test]
    async fn test_get_cancelled_before_send() {
        let (tx, rx) = tokio::sync::watch::channel(false);
        tx.send(true).unwrap();
        let client = TeamtailorClient::new(&config("http://127.0.0.1:9")).unwrap();

        let result = client
            .get(&PageRequest::next("/candidates"), &Cancellation::new(rx))
            .await;

        assert_eq!(result, Err(TransportError::Cancelled));
    }
}
