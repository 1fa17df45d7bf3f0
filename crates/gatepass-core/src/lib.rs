#![deny(missing_docs)]

//! # gatepass-core -- Foundational Types for the Gate Validator
//!
//! Every other crate in the workspace depends on this one. It performs no
//! I/O: no network, no camera, no filesystem. Only `serde`, `thiserror`,
//! `chrono`, `uuid`, `regex` and `url` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for station identifiers.** A [`GateId`] is non-empty
//!    by construction, so a request without a gate cannot be built.
//!
//! 2. **The decoder never fails.** [`decode_payload`] always yields a
//!    [`DecodedIdentifier`]; unrecognised input is surfaced as
//!    [`DecodedIdentifier::Raw`] instead of being silently relabelled.
//!
//! 3. **One outcome vocabulary.** Both authority endpoints converge on
//!    [`ValidationStatus`]. Wire-level synonyms (`replayed`) are normalised
//!    at the client boundary, never downstream.
//!
//! 4. **Feedback is data.** [`feedback_for`] maps an outcome to a
//!    [`Feedback`] description; playing tones or vibrating is the caller's job.

pub mod decoder;
pub mod error;
pub mod feedback;
pub mod history;
pub mod identity;
pub mod outcome;

// Re-export primary types at crate root for ergonomic imports.
pub use decoder::{decode_payload, deep_link_payload, looks_like_token, DecodedIdentifier, Decoder};
pub use error::ValidationError;
pub use feedback::{compose_message, feedback_for, Banner, Feedback, FeedbackLatch, Tone};
pub use history::{History, HistoryEntry, HISTORY_CAPACITY};
pub use identity::{DeviceId, GateId};
pub use outcome::{ValidationDetails, ValidationOutcome, ValidationRequest, ValidationStatus};
