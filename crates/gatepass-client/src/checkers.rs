//! Typed client for checker (gate staff) sessions.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/checkers/login` | Exchange username/email + password for a token |
//! | GET    | `/checkers/me` | Profile of the logged-in checker |

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ValidatorApiError;

/// Login request body.
#[derive(Serialize)]
pub struct CheckerLoginRequest<'a> {
    /// Username or email.
    pub user: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for CheckerLoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckerLoginRequest")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Checker profile as returned by `GET /checkers/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Gate the organizer assigned this checker to.
    #[serde(default)]
    pub gate: Option<String>,
}

impl CheckerProfile {
    /// `Name (@user)`, `Name`, `@user`, or empty.
    pub fn display_name(&self) -> String {
        let name = self.full_name.as_deref().filter(|s| !s.trim().is_empty());
        let user = self.username.as_deref().filter(|s| !s.trim().is_empty());
        match (name, user) {
            (Some(n), Some(u)) => format!("{n} (@{u})"),
            (Some(n), None) => n.to_string(),
            (None, Some(u)) => format!("@{u}"),
            (None, None) => String::new(),
        }
    }
}

/// Client for checker session endpoints.
#[derive(Debug, Clone)]
pub struct CheckerClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl CheckerClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Log a checker in.
    ///
    /// Calls `POST {base_url}/checkers/login`. A 2xx without a token is
    /// reported as `Unauthorized`, matching a rejected login.
    pub async fn login(
        &self,
        req: &CheckerLoginRequest<'_>,
    ) -> Result<Zeroizing<String>, ValidatorApiError> {
        let endpoint = "POST /checkers/login";
        let url = crate::endpoint_url(&self.base_url, &["checkers", "login"])?;

        let resp = crate::retry::retry_connect(|| self.http.post(url.clone()).json(req).send())
            .await
            .map_err(|e| ValidatorApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let body: LoginResponse = crate::check_status(endpoint, resp)
            .await?
            .json()
            .await
            .map_err(|e| ValidatorApiError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;

        body.token
            .filter(|t| !t.is_empty())
            .map(Zeroizing::new)
            .ok_or_else(|| ValidatorApiError::Unauthorized {
                endpoint: endpoint.into(),
            })
    }

    /// Fetch the logged-in checker's profile.
    ///
    /// Calls `GET {base_url}/checkers/me`.
    pub async fn me(&self) -> Result<CheckerProfile, ValidatorApiError> {
        let endpoint = "GET /checkers/me";
        let url = crate::endpoint_url(&self.base_url, &["checkers", "me"])?;

        let resp = crate::retry::retry_connect(|| self.http.get(url.clone()).send())
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
