//! Validation authority client error types.

/// Errors from validation authority calls.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The authority rejected the checker's credentials (HTTP 401).
    ///
    /// Kept apart from every other failure: the operator must log in again,
    /// the ticket was not judged.
    #[error("{endpoint} requires checker login")]
    Unauthorized { endpoint: String },
    /// The authority returned another non-2xx status.
    #[error("validation API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ValidatorApiError {
    /// Whether the operator has to log in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
