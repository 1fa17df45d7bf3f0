//! Typed client for the ticket validation endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/validate/{ticketId}` | Validate by ticket id |
//! | POST   | `/validate` | Validate a signed token |
//!
//! Both answer `{status, details?}`. The token endpoint reports a second
//! presentation of the same token as `replayed`; [`normalize_status`] folds
//! that into `already_used` so callers only ever see one vocabulary.

use gatepass_core::{ValidationDetails, ValidationOutcome, ValidationRequest, ValidationStatus};
use serde::{Deserialize, Serialize};

use crate::error::ValidatorApiError;

// -- Wire types -----------------------------------------------------------------

/// Status values as sent by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireStatus {
    Valid,
    AlreadyUsed,
    /// Token endpoint only: the token was presented before.
    Replayed,
    Invalid,
    /// Forward-compatible catch-all for statuses introduced later.
    #[serde(other)]
    Unknown,
}

/// Response body of both validation endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    #[serde(default = "unknown_status")]
    pub status: WireStatus,
    #[serde(default)]
    pub details: Option<ValidationDetails>,
}

fn unknown_status() -> WireStatus {
    WireStatus::Unknown
}

/// Body of `POST /validate/{ticketId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateByIdBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<&'a str>,
}

/// Body of `POST /validate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTokenBody<'a> {
    pub token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<&'a str>,
}

/// Map a wire status onto the canonical vocabulary.
pub fn normalize_status(status: WireStatus) -> ValidationStatus {
    match status {
        WireStatus::Valid => ValidationStatus::Valid,
        WireStatus::AlreadyUsed | WireStatus::Replayed => ValidationStatus::AlreadyUsed,
        WireStatus::Invalid => ValidationStatus::Invalid,
        WireStatus::Unknown => ValidationStatus::Error,
    }
}

impl ValidateResponse {
    /// Normalise into a client-side outcome.
    pub fn into_outcome(self) -> ValidationOutcome {
        ValidationOutcome::from_authority(normalize_status(self.status), self.details)
    }
}

// -- Client -----------------------------------------------------------------------

/// Client for the validation endpoints.
#[derive(Debug, Clone)]
pub struct ValidationClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl ValidationClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Validate a ticket by id.
    ///
    /// Calls `POST {base_url}/validate/{ticket_id}`.
    pub async fn by_id(
        &self,
        ticket_id: &str,
        body: &ValidateByIdBody<'_>,
    ) -> Result<ValidateResponse, ValidatorApiError> {
        let endpoint = "POST /validate/{ticketId}";
        let url = crate::endpoint_url(&self.base_url, &["validate", ticket_id])?;
        self.post(endpoint, url, body).await
    }

    /// Validate a signed ticket token.
    ///
    /// Calls `POST {base_url}/validate`.
    pub async fn by_token(
        &self,
        body: &ValidateTokenBody<'_>,
    ) -> Result<ValidateResponse, ValidatorApiError> {
        let endpoint = "POST /validate";
        let url = crate::endpoint_url(&self.base_url, &["validate"])?;
        self.post(endpoint, url, body).await
    }

    /// Route a request to the endpoint its identifier calls for and
    /// normalise the answer.
    ///
    /// Tokens go to `POST /validate`; ticket ids and unrecognised raw
    /// payloads go to `POST /validate/{id}`.
    pub async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationOutcome, ValidatorApiError> {
        let gate_id = Some(request.gate.as_str());
        let device_id = request.device.as_ref().map(|d| d.as_str());
        let identifier = &request.identifier;

        tracing::debug!(kind = identifier.kind(), gate = %request.gate, "submitting validation");

        let response = if identifier.is_token() {
            self.by_token(&ValidateTokenBody {
                token: identifier.value(),
                gate_id,
                device_id,
            })
            .await?
        } else {
            self.by_id(identifier.value(), &ValidateByIdBody { gate_id, device_id })
                .await?
        };

        if response.status == WireStatus::Unknown {
            tracing::warn!(kind = identifier.kind(), "authority answered with an unknown status");
        }
        Ok(response.into_outcome())
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        url: url::Url,
        body: &B,
    ) -> Result<ValidateResponse, ValidatorApiError> {
        let resp = crate::retry::retry_connect(|| self.http.post(url.clone()).json(body).send())
            .await
            .map_err(|e| ValidatorApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        crate::check_status(endpoint, resp)
            .await?
            .json()
            .await
            .map_err(|e| ValidatorApiError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replayed_and_already_used_converge() {
        assert_eq!(normalize_status(WireStatus::Replayed), ValidationStatus::AlreadyUsed);
        assert_eq!(normalize_status(WireStatus::AlreadyUsed), ValidationStatus::AlreadyUsed);
    }

    #[test]
    fn unknown_status_is_an_error() {
        let resp: ValidateResponse =
            serde_json::from_value(serde_json::json!({"status": "pending"})).unwrap();
        assert_eq!(resp.status, WireStatus::Unknown);
        assert_eq!(resp.into_outcome().status, ValidationStatus::Error);
    }

    #[test]
    fn missing_status_is_an_error() {
        let resp: ValidateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(resp.into_outcome().status, ValidationStatus::Error);
    }

    #[test]
    fn by_id_body_omits_absent_device() {
        let body = ValidateByIdBody {
            gate_id: Some("Principal"),
            device_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"gateId": "Principal"})
        );
    }

    #[test]
    fn token_body_shape() {
        let body = ValidateTokenBody {
            token: "a.b.c",
            gate_id: Some("Norte"),
            device_id: Some("Celular 01"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"token": "a.b.c", "gateId": "Norte", "deviceId": "Celular 01"})
        );
    }
}
