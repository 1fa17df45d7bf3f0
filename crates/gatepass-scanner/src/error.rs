//! Error types for the scanner: controller misuse, camera acquisition, and
//! the on-disk station profile.

use std::path::PathBuf;

use thiserror::Error;

/// Controller operations refused in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Gate and device are fixed while a request is in flight.
    #[error("station cannot change while a validation is in flight")]
    StationLocked,
}

/// Why a camera could not be started. Messages are shown to the operator.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Permissão da câmera negada. Verifique as permissões do dispositivo.")]
    PermissionDenied,

    #[error("Nenhuma câmera encontrada.")]
    NotFound,

    #[error("A câmera está em uso por outro aplicativo.")]
    Busy,

    /// The decoder program could not be run at all.
    #[error("Leitor de QR indisponível: {0}")]
    Unsupported(String),

    #[error("Falha ao iniciar a câmera: {0}")]
    Other(String),
}

impl CameraError {
    /// Map an I/O failure while opening a device or spawning its decoder.
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::NotFound => Self::NotFound,
            // EBUSY
            _ if err.raw_os_error() == Some(16) => Self::Busy,
            _ => Self::Other(err.to_string()),
        }
    }
}

/// Errors reading or writing the station profile.
#[derive(Error, Debug)]
pub enum StationError {
    #[error("station file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("station file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Neither `GATEPASS_STATION_FILE` nor a user config directory is available.
    #[error("no location for the station file; set GATEPASS_STATION_FILE")]
    NoLocation,
}
