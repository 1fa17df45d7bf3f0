//! # Validation Outcome Vocabulary
//!
//! The single result vocabulary shared by both authority endpoints and by
//! locally produced failures. An outcome is created once per request and
//! never mutated afterwards; the feedback mapping and the history ring both
//! consume it by reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decoder::DecodedIdentifier;
use crate::identity::{DeviceId, GateId};

/// Canonical classification of a validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Ticket accepted; the holder may enter.
    Valid,
    /// Ticket was already consumed earlier (includes replayed tokens).
    AlreadyUsed,
    /// Ticket unknown or rejected by the authority.
    Invalid,
    /// Validation could not be completed.
    Error,
}

impl ValidationStatus {
    /// Headline shown to the operator for this status.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Valid => "Liberado",
            Self::AlreadyUsed => "Já utilizado",
            Self::Invalid => "Inválido",
            Self::Error => "Erro ao validar",
        }
    }

    /// Whether the authority recognised the ticket (valid or already used).
    pub fn is_recognised(self) -> bool {
        matches!(self, Self::Valid | Self::AlreadyUsed)
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Valid => "valid",
            Self::AlreadyUsed => "already_used",
            Self::Invalid => "invalid",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Context returned by the authority alongside a classification.
///
/// Every field is optional; the authority omits what it does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    /// Gate at which the ticket was (first) used.
    #[serde(default)]
    pub gate_id: Option<String>,
    /// When the ticket was (first) used, as reported by the authority.
    #[serde(default)]
    pub used_at: Option<String>,
    /// Display name of the checker who validated the ticket.
    #[serde(default)]
    pub checker_name: Option<String>,
    /// Username of the checker who validated the ticket.
    #[serde(default)]
    pub checker_username: Option<String>,
    /// Ticket holder name. Email and token are never displayed.
    #[serde(default)]
    pub holder_name: Option<String>,
}

impl ValidationDetails {
    /// Whether no field is populated.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A request to validate one decoded identifier at one gate.
///
/// The gate is mandatory by type: a request cannot exist without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// What was scanned.
    pub identifier: DecodedIdentifier,
    /// Where it was scanned.
    pub gate: GateId,
    /// Which device scanned it, if configured.
    pub device: Option<DeviceId>,
}

impl ValidationRequest {
    /// Assemble a request.
    pub fn new(identifier: DecodedIdentifier, gate: GateId, device: Option<DeviceId>) -> Self {
        Self {
            identifier,
            gate,
            device,
        }
    }
}

/// The result of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Unique per outcome; feedback is fired at most once per id.
    pub id: Uuid,
    /// Canonical classification.
    pub status: ValidationStatus,
    /// Authority-provided context, if any.
    pub details: Option<ValidationDetails>,
    /// Local explanation replacing the generic headline (e.g. missing gate).
    pub note: Option<String>,
    /// When the client produced this outcome.
    pub received_at: DateTime<Utc>,
}

impl ValidationOutcome {
    /// Outcome classified by the authority.
    pub fn from_authority(status: ValidationStatus, details: Option<ValidationDetails>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status,
            details: details.filter(|d| !d.is_empty()),
            note: None,
            received_at: Utc::now(),
        }
    }

    /// Generic `error` outcome; the cause is logged, not shown.
    pub fn failure() -> Self {
        Self::from_authority(ValidationStatus::Error, None)
    }

    /// `error` outcome produced locally with an operator-facing note.
    pub fn local_error(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::failure()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_wire_spelling() {
        let json = serde_json::to_string(&ValidationStatus::AlreadyUsed).unwrap();
        assert_eq!(json, "\"already_used\"");
        assert_eq!(ValidationStatus::AlreadyUsed.to_string(), "already_used");
    }

    #[test]
    fn details_accept_camel_case_and_missing_fields() {
        let details: ValidationDetails = serde_json::from_value(serde_json::json!({
            "gateId": "Principal",
            "usedAt": "2024-01-01T10:00:00Z",
            "unexpected": true
        }))
        .unwrap();
        assert_eq!(details.gate_id.as_deref(), Some("Principal"));
        assert_eq!(details.used_at.as_deref(), Some("2024-01-01T10:00:00Z"));
        assert!(details.checker_name.is_none());
    }

    #[test]
    fn empty_details_are_dropped() {
        let outcome =
            ValidationOutcome::from_authority(ValidationStatus::Valid, Some(ValidationDetails::default()));
        assert!(outcome.details.is_none());
    }

    #[test]
    fn local_error_carries_note_and_fresh_id() {
        let a = ValidationOutcome::local_error("Informe o Portão antes de validar");
        let b = ValidationOutcome::local_error("Informe o Portão antes de validar");
        assert_eq!(a.status, ValidationStatus::Error);
        assert_eq!(a.note.as_deref(), Some("Informe o Portão antes de validar"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn recognised_statuses() {
        assert!(ValidationStatus::Valid.is_recognised());
        assert!(ValidationStatus::AlreadyUsed.is_recognised());
        assert!(!ValidationStatus::Invalid.is_recognised());
        assert!(!ValidationStatus::Error.is_recognised());
    }
}
