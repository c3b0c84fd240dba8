//! API key handling
//!
//! The upstream API key lives in a [`SecretString`]: its `Debug` output is
//! redacted and the backing buffer is zeroed on drop. Reading it requires an
//! explicit `expose_secret()`, which only the HTTP client does when building
//! its `Authorization` header.
//!
//! ```rust
//! use candex::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("tt-key".to_string());
//! assert_eq!(api_key.expose_secret(), "tt-key");
//! assert!(!format!("{api_key:?}").contains("tt-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroize;

/// String payload of a [`SecretString`]
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

// Needed so `CandexConfig` stays `Serialize`; nothing in candex serializes it
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// Whether the secret is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A zeroize-on-drop string with redacted `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string, e.g. one read from the environment
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_debug_is_redacted() {
        let key = secret_string("tt-live-123".to_string());
        let debug_output = format!("{key:?}");

        assert!(!debug_output.contains("tt-live-123"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_exposed_value_debug_is_redacted() {
        let key = secret_string("tt-live-123".to_string());
        let debug_output = format!("{:?}", key.expose_secret());

        assert_eq!(debug_output, "SecretValue([REDACTED])");
        assert_eq!(key.expose_secret(), "tt-live-123");
    }

    #[test]
    fn test_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            api_key: SecretString,
        }

        let section: Section = toml::from_str("api_key = \"tt-live-123\"").unwrap();
        assert_eq!(section.api_key.expose_secret(), "tt-live-123");
        assert!(!section.api_key.expose_secret().is_empty());
    }

    #[test]
    fn test_empty_secret() {
        assert!(secret_string(String::new()).expose_secret().is_empty());
    }
}
