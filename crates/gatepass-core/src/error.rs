//! # Error Hierarchy
//!
//! Structured error types for the gate validator, built with `thiserror`.
//! Validation errors carry the operator-facing wording so that the caller can
//! surface them without re-phrasing.

use thiserror::Error;

/// Validation errors for station identifiers and scan input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No gate has been configured for this station.
    #[error("Informe o Portão antes de validar")]
    MissingGate,

    /// A device identifier was supplied but is blank after trimming.
    #[error("device identifier must not be blank")]
    BlankDevice,
}
