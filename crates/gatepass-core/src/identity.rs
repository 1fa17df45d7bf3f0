//! # Station Identifiers
//!
//! A validation request is always attributed to a gate (mandatory) and
//! optionally to a device. Both are free-form operator labels such as
//! `"Principal"` or `"Celular 01"`, trimmed at construction.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Gate (portão) at which a ticket is being validated.
///
/// Never empty: construction trims the input and rejects blank labels with
/// [`ValidationError::MissingGate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GateId(String);

impl GateId {
    /// Create a gate identifier, trimming surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingGate);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a gate from an optional stored label, treating blank as absent.
    pub fn from_optional(label: Option<&str>) -> Option<Self> {
        label.and_then(|l| Self::new(l).ok())
    }

    /// Access the gate label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GateId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GateId> for String {
    fn from(id: GateId) -> Self {
        id.0
    }
}

impl std::fmt::Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Device (handset, kiosk) performing the validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a device identifier, trimming surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankDevice);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a device from an optional stored label, treating blank as absent.
    pub fn from_optional(label: Option<&str>) -> Option<Self> {
        label.and_then(|l| Self::new(l).ok())
    }

    /// Access the device label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
