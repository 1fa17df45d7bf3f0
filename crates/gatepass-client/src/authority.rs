//! # Validation Authority Seam
//!
//! The scan loop does not care whether a ticket is judged by the HTTP
//! backend or by a test double; it needs something that turns a
//! [`ValidationRequest`] into a [`ValidationOutcome`]. [`ValidationAuthority`]
//! is that seam. [`GatepassClient`](crate::GatepassClient) is the production
//! implementation.
//!
//! Implementations must be `Send + Sync` so a controller can be shared across
//! tasks behind an `Arc`, and the returned future must be `Send` so each
//! submission can run on its own task.

use std::future::Future;

use gatepass_core::{ValidationOutcome, ValidationRequest};

use crate::error::ValidatorApiError;

/// Something that can judge a ticket.
pub trait ValidationAuthority: Send + Sync {
    /// Judge one request.
    ///
    /// `Err(ValidatorApiError::Unauthorized { .. })` means the operator must
    /// log in again. Every other error is reported to the operator as a
    /// generic validation failure.
    fn validate(
        &self,
        request: &ValidationRequest,
    ) -> impl Future<Output = Result<ValidationOutcome, ValidatorApiError>> + Send;
}

impl ValidationAuthority for crate::GatepassClient {
    fn validate(
        &self,
        request: &ValidationRequest,
    ) -> impl Future<Output = Result<ValidationOutcome, ValidatorApiError>> + Send {
        self.validation().validate(request)
    }
}

impl<T: ValidationAuthority> ValidationAuthority for std::sync::Arc<T> {
    fn validate(
        &self,
        request: &ValidationRequest,
    ) -> impl Future<Output = Result<ValidationOutcome, ValidatorApiError>> + Send {
        (**self).validate(request)
    }
}
