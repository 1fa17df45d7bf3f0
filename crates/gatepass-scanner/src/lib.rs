//! # gatepass-scanner -- Gate station scan loop
//!
//! Turns a stream of decoded QR payloads into at most one validation request
//! at a time.
//!
//! - [`ScanController`]: duplicate suppression, the single in-flight lock,
//!   cooldown, request timeout, and the recent-outcome history.
//! - [`Camera`]: exactly one open device at a time, stopped on every exit.
//! - [`run_scan_loop`]: wires a camera to a controller until shutdown.
//! - [`StationStore`]: gate, device, and checker session persisted between
//!   runs.
//!
//! The controller is generic over [`gatepass_client::ValidationAuthority`],
//! so everything here runs against a test double as readily as against the
//! HTTP backend.

pub mod camera;
pub mod controller;
pub mod error;
pub mod scan_loop;
pub mod settings;
pub mod source;
pub mod station;

pub use camera::{preferred_device, Camera, CameraBackend, CameraDevice, PayloadStream};
pub use controller::{Disposition, DropReason, ScanController, Station};
pub use error::{CameraError, ControllerError, StationError};
pub use scan_loop::{run_scan_loop, ScanLoopExit};
pub use settings::ScanSettings;
pub use source::{CommandBackend, LineStream, StdinBackend};
pub use station::{StationProfile, StationStore};
