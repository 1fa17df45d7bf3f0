//! # Station Profile
//!
//! What a gate station remembers between runs: the gate it stands at, the
//! device label it reports, and the checker session token. Stored as a
//! small JSON document, written owner-readable only on Unix.
//!
//! The field names of the gate and device keys are kept stable so a profile
//! written by earlier station software is still picked up.

use std::path::{Path, PathBuf};

use gatepass_core::{looks_like_token, DeviceId, GateId};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::controller::Station;
use crate::error::StationError;

/// Environment variable overriding the station file location.
pub const STATION_FILE_ENV: &str = "GATEPASS_STATION_FILE";

/// Persisted station settings and session.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct StationProfile {
    #[serde(rename = "validator_gateId", default, skip_serializing_if = "Option::is_none")]
    gate_id: Option<String>,
    #[serde(rename = "validator_deviceId", default, skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,
    #[serde(rename = "checker_token", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

impl std::fmt::Debug for StationProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationProfile")
            .field("gate_id", &self.gate_id)
            .field("device_id", &self.device_id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StationProfile {
    pub fn gate(&self) -> Option<GateId> {
        GateId::from_optional(self.gate_id.as_deref())
    }

    pub fn device(&self) -> Option<DeviceId> {
        DeviceId::from_optional(self.device_id.as_deref())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Blank labels clear the field.
    pub fn set_gate(&mut self, gate: Option<&str>) {
        self.gate_id = GateId::from_optional(gate).map(String::from);
    }

    pub fn set_device(&mut self, device: Option<&str>) {
        self.device_id = DeviceId::from_optional(device).map(String::from);
    }

    pub fn set_token(&mut self, token: Option<&str>) {
        if let Some(old) = self.token.as_mut() {
            old.zeroize();
        }
        self.token = token.map(str::trim).filter(|t| !t.is_empty()).map(String::from);
    }

    /// A stored token only counts as a session if it is JWT-shaped.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some_and(looks_like_token)
    }

    /// Gate and device for a [`ScanController`](crate::ScanController).
    pub fn station(&self) -> Station {
        Station {
            gate: self.gate(),
            device: self.device(),
        }
    }
}

/// Reads and writes the station profile at a fixed path.
#[derive(Debug, Clone)]
pub struct StationStore {
    path: PathBuf,
}

impl StationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$GATEPASS_STATION_FILE`, else `<config dir>/gatepass/station.json`.
    pub fn from_env() -> Result<Self, StationError> {
        if let Some(path) = std::env::var_os(STATION_FILE_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir().ok_or(StationError::NoLocation)?;
        Ok(Self::new(dir.join("gatepass").join("station.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty profile.
    pub fn load(&self) -> Result<StationProfile, StationError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StationProfile::default())
            }
            Err(source) => {
                return Err(StationError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StationError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write via a sibling temp file and rename, so a crash never leaves a
    /// half-written profile.
    pub fn save(&self, profile: &StationProfile) -> Result<(), StationError> {
        let io_err = |source| StationError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut json = serde_json::to_vec_pretty(profile).map_err(|source| StationError::Parse {
            path: self.path.clone(),
            source,
        })?;
        json.push(b'\n');

        let tmp = self.path.with_extension("json.tmp");
        let written = std::fs::write(&tmp, &json);
        json.zeroize();
        written.map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }

        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), "station profile saved");
        Ok(())
    }

    /// Load, apply `f`, save.
    pub fn update(
        &self,
        f: impl FnOnce(&mut StationProfile),
    ) -> Result<StationProfile, StationError> {
        let mut profile = self.load()?;
        f(&mut profile);
        self.save(&profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JWT: &str = "eyJhbGciOi.eyJzdWIiOiJhbmEifQ.c2lnbmF0dXJl";

    fn store() -> (tempfile::TempDir, StationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StationStore::new(dir.path().join("nested").join("station.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty_profile() {
        let (_dir, store) = store();
        let profile = store.load().unwrap();
        assert_eq!(profile, StationProfile::default());
        assert!(profile.gate().is_none());
        assert!(!profile.is_logged_in());
    }

    #[test]
    fn save_then_load() {
        let (_dir, store) = store();
        let mut profile = StationProfile::default();
        profile.set_gate(Some(" Principal "));
        profile.set_device(Some("Celular 01"));
        profile.set_token(Some(JWT));
        store.save(&profile).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.gate().unwrap().as_str(), "Principal");
        assert_eq!(loaded.device().unwrap().as_str(), "Celular 01");
        assert!(loaded.is_logged_in());
        assert_eq!(loaded.station().gate, loaded.gate());
    }

    #[test]
    fn keys_are_stable() {
        let (_dir, store) = store();
        store
            .update(|p| {
                p.set_gate(Some("Norte"));
                p.set_device(Some("Tablet"));
            })
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["validator_gateId"], "Norte");
        assert_eq!(raw["validator_deviceId"], "Tablet");
        assert!(raw.get("checker_token").is_none());
    }

    #[test]
    fn blank_labels_clear_fields() {
        let mut profile = StationProfile::default();
        profile.set_gate(Some("Principal"));
        profile.set_gate(Some("   "));
        assert!(profile.gate().is_none());
    }

    #[test]
    fn non_jwt_token_is_not_a_session() {
        let mut profile = StationProfile::default();
        profile.set_token(Some("opaque"));
        assert_eq!(profile.token(), Some("opaque"));
        assert!(!profile.is_logged_in());
    }

    #[test]
    fn debug_redacts_token() {
        let mut profile = StationProfile::default();
        profile.set_token(Some(JWT));
        let dbg = format!("{profile:?}");
        assert!(!dbg.contains(JWT));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(StationError::Parse { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = store();
        store.save(&StationProfile::default()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
