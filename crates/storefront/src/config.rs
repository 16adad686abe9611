//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PAPERBACK_API_BASE_URL` - Backend gateway base URL (default: `http://localhost:8080/api`)
//! - `PAPERBACK_USE_FIXTURES` - Serve fixture data instead of calling the gateway (default: false)
//! - `PAPERBACK_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `PAPERBACK_AUTH_TOKEN` - Seed bearer credential for the session store
//!
//! The loaded configuration is passed into facade construction rather than
//! read from ambient process state, so tests can instantiate fixture-mode
//! and live-mode facades side by side.

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default gateway base URL when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which data source the facade serves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Call the backend gateway; degrade to fixtures on failure.
    #[default]
    Live,
    /// Serve the in-memory fixture catalog without any network calls.
    Fixtures,
}

impl DataMode {
    /// True when the facade serves fixtures without any network calls.
    #[must_use]
    pub const fn is_fixtures(self) -> bool {
        matches!(self, Self::Fixtures)
    }
}

/// Backend gateway configuration.
///
/// Implements `Debug` manually to redact the seed credential.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the backend gateway (e.g., `http://localhost:8080/api`).
    pub api_base_url: Url,
    /// Fixture vs. live operation, fixed for the lifetime of a facade.
    pub mode: DataMode,
    /// Fixed timeout applied to every outgoing request.
    pub request_timeout: Duration,
    /// Optional bearer credential used to seed the session store.
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("mode", &self.mode)
            .field("request_timeout", &self.request_timeout)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("PAPERBACK_API_BASE_URL", DEFAULT_API_BASE_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PAPERBACK_API_BASE_URL".to_string(), e.to_string())
            })?;

        let mode = if parse_bool(&get_env_or_default("PAPERBACK_USE_FIXTURES", "false")) {
            DataMode::Fixtures
        } else {
            DataMode::Live
        };

        let timeout_secs = get_env_or_default(
            "PAPERBACK_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("PAPERBACK_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let auth_token = get_optional_env("PAPERBACK_AUTH_TOKEN").map(SecretString::from);

        Ok(Self {
            api_base_url,
            mode,
            request_timeout: Duration::from_secs(timeout_secs),
            auth_token,
        })
    }

    /// A fixture-mode configuration that never touches the network.
    ///
    /// # Panics
    ///
    /// Never panics; the default base URL is a valid constant.
    #[must_use]
    pub fn fixtures() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            mode: DataMode::Fixtures,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_token: None,
        }
    }

    /// A live-mode configuration pointed at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn live(base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = base_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidEnvVar("base_url".to_string(), e.to_string())
        })?;
        Ok(Self {
            api_base_url,
            mode: DataMode::Live,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_token: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the conventional truthy spellings of a boolean flag.
fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_fixtures_config() {
        let config = BackendConfig::fixtures();
        assert!(config.mode.is_fixtures());
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/api");
    }

    #[test]
    fn test_live_config() {
        let config = BackendConfig::live("http://127.0.0.1:9/api").unwrap();
        assert_eq!(config.mode, DataMode::Live);
        assert!(BackendConfig::live("not a url").is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = BackendConfig::fixtures();
        config.auth_token = Some(SecretString::from("super-secret-token"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
    }
}
