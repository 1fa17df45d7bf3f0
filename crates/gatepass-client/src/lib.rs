//! # gatepass-client -- Typed Rust client for the ticket validation authority
//!
//! Provides typed access to the parts of the ticketing backend a gate needs:
//! - **Validation** via `POST /validate/{ticketId}` and `POST /validate`
//! - **Checker sessions** via `POST /checkers/login` and `GET /checkers/me`
//!
//! ## Architecture
//!
//! The backend owns the ticket lifecycle (issued, used) and double-use
//! prevention. This crate never infers ticket state; it submits, then
//! normalises the answer into the [`gatepass_core::ValidationStatus`]
//! vocabulary.
//!
//! ## API Path Convention
//!
//! Endpoint paths are appended as URL segments to the configured API root,
//! so `https://ingressos.example/api` + `validate/{id}` becomes
//! `https://ingressos.example/api/validate/{id}` with the id percent-encoded.

pub mod authority;
pub mod checkers;
pub mod config;
pub mod error;
pub(crate) mod retry;
pub mod validate;

pub use authority::ValidationAuthority;
pub use config::ValidatorApiConfig;
pub use error::ValidatorApiError;

use std::time::Duration;

use config::ConfigError;

/// Top-level validation authority client. Holds sub-clients per concern.
#[derive(Debug, Clone)]
pub struct GatepassClient {
    validation: validate::ValidationClient,
    checkers: checkers::CheckerClient,
}

impl GatepassClient {
    /// Create a new client from configuration.
    pub fn new(config: ValidatorApiConfig) -> Result<Self, ValidatorApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = config.api_token.as_ref() {
            let mut value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ConfigError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ValidatorApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            validation: validate::ValidationClient::new(http.clone(), config.base_url.clone()),
            checkers: checkers::CheckerClient::new(http, config.base_url),
        })
    }

    /// Access the validation endpoints.
    pub fn validation(&self) -> &validate::ValidationClient {
        &self.validation
    }

    /// Access the checker session endpoints.
    pub fn checkers(&self) -> &checkers::CheckerClient {
        &self.checkers
    }
}

/// Append path segments to the API root, percent-encoding each.
pub(crate) fn endpoint_url(base: &url::Url, segments: &[&str]) -> Result<url::Url, ValidatorApiError> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ConfigError::NotABase(base.to_string()))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Turn 401 into `Unauthorized` and any other non-2xx into `ApiError`.
pub(crate) async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ValidatorApiError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        tracing::warn!(endpoint, "authority rejected checker credentials");
        return Err(ValidatorApiError::Unauthorized {
            endpoint: endpoint.into(),
        });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ValidatorApiError::ApiError {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
