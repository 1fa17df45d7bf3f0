//! Validation authority client configuration.
//!
//! Points at the ticketing backend's API root (the same base the storefront
//! uses, e.g. `https://ingressos.example/api`). Override via environment
//! variables or explicit construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Default API root when `GATEPASS_API_URL` is unset: the backend on a
/// developer machine.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for connecting to the validation authority.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ValidatorApiConfig {
    /// API root; endpoint paths are appended as segments.
    pub base_url: Url,
    /// Checker bearer token. Requests are sent unauthenticated when absent,
    /// and the authority answers 401.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ValidatorApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ValidatorApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GATEPASS_API_URL` (default: `http://127.0.0.1:8000/api`)
    /// - `GATEPASS_API_TOKEN` (optional)
    /// - `GATEPASS_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("GATEPASS_API_URL", DEFAULT_API_URL)?,
            api_token: std::env::var("GATEPASS_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(Zeroizing::new),
            timeout_secs: std::env::var("GATEPASS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Configuration for an explicit API root with default timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Replace the bearer token. Blank tokens clear it.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.api_token = if token.trim().is_empty() {
            None
        } else {
            Some(Zeroizing::new(token))
        };
        self
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16, token: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}/api"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_token: None,
            timeout_secs: 5,
        }
        .with_token(token))
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API root {0} cannot carry path segments")]
    NotABase(String),
    #[error("bearer token contains characters not allowed in a header")]
    InvalidToken,
}
