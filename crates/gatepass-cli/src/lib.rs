//! # gatepass-cli -- Gate station command line
//!
//! Provides the `gatepass` command used at venue gates.
//!
//! ## Subcommands
//!
//! - `gatepass validate` -- Validate one scanned payload or deep link.
//! - `gatepass scan` -- Scan continuously from a camera or standard input.
//! - `gatepass station` -- Show or change the stored gate and device.
//! - `gatepass login` / `logout` / `whoami` -- Checker session.
//! - `gatepass cameras` -- List video devices.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Ticket valid (or command succeeded) |
//! | 1 | Operational error |
//! | 2 | Ticket already used, invalid, or not validated |
//! | 3 | Checker must log in again |
//!
//! ```bash
//! gatepass station set --gate Principal --device "Celular 01"
//! gatepass login --user ana
//! gatepass validate 'https://ingressos.example/validator?id=ab12cd34ef56ab12cd34ef56'
//! gatepass scan
//! ```

pub mod auth;
pub mod present;
pub mod scan;
pub mod station;
pub mod validate;

use anyhow::Result;
use chrono::FixedOffset;

use gatepass_client::{GatepassClient, ValidatorApiConfig};
use gatepass_core::{DeviceId, GateId, ValidationStatus};
use gatepass_scanner::{Station, StationProfile, StationStore};

/// Ticket valid, or a non-validating command succeeded.
pub const EXIT_OK: u8 = 0;
/// Configuration, I/O, or transport failure outside a validation.
pub const EXIT_FAILURE: u8 = 1;
/// Ticket not admitted.
pub const EXIT_NOT_ADMITTED: u8 = 2;
/// Checker session missing or expired.
pub const EXIT_REAUTH: u8 = 3;

/// Shared state for subcommand handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub store: StationStore,
    pub api: ValidatorApiConfig,
    /// Zone times are displayed in.
    pub offset: FixedOffset,
    /// Ring the terminal bell on results.
    pub bell: bool,
}

impl Context {
    pub fn load_profile(&self) -> Result<StationProfile> {
        Ok(self.store.load()?)
    }

    /// Client authenticated with the configured token, else the stored session.
    pub fn client(&self, profile: &StationProfile) -> Result<GatepassClient> {
        let mut config = self.api.clone();
        if config.api_token.is_none() {
            if let Some(token) = profile.token() {
                config = config.with_token(token);
            }
        }
        Ok(GatepassClient::new(config)?)
    }
}

/// Stored station with command-line overrides applied.
pub fn station_for(profile: &StationProfile, gate: Option<&str>, device: Option<&str>) -> Station {
    Station {
        gate: match gate {
            Some(label) => GateId::from_optional(Some(label)),
            None => profile.gate(),
        },
        device: match device {
            Some(label) => DeviceId::from_optional(Some(label)),
            None => profile.device(),
        },
    }
}

/// Exit code for a validation result.
pub fn exit_code(status: ValidationStatus) -> u8 {
    match status {
        ValidationStatus::Valid => EXIT_OK,
        _ => EXIT_NOT_ADMITTED,
    }
}
