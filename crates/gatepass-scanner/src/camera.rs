//! # Camera Lifecycle
//!
//! A [`CameraBackend`] knows how to enumerate devices and open one into a
//! [`PayloadStream`] of decoded QR payloads. [`Camera`] owns at most one open
//! stream and guarantees it is stopped when replaced, when scanning stops,
//! and when the camera itself is dropped.
//!
//! Without an explicit choice, the rear-facing device is preferred, matched
//! by label; otherwise the first device listed is used.

use std::future::Future;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::CameraError;

/// A video input as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Backend-specific handle, e.g. `/dev/video0`.
    pub id: String,
    /// Human-readable name.
    pub label: String,
}

/// Decoded payloads from one open device.
pub trait PayloadStream: Send {
    /// Next payload, or `None` once the device has closed.
    ///
    /// Must be cancel-safe: dropping the future loses no payload that has
    /// not yet been returned.
    fn next_payload(&mut self) -> impl Future<Output = Option<String>> + Send;

    /// Release the device. Idempotent.
    fn stop(&mut self);
}

/// Source of devices and their streams.
pub trait CameraBackend: Send + Sync {
    type Stream: PayloadStream;

    fn devices(&self) -> Result<Vec<CameraDevice>, CameraError>;

    fn open(&self, device: &CameraDevice) -> Result<Self::Stream, CameraError>;
}

/// Rear-facing device if one is labelled as such, else the first.
pub fn preferred_device(devices: &[CameraDevice]) -> Option<&CameraDevice> {
    static REAR: OnceLock<Regex> = OnceLock::new();
    let rear = REAR.get_or_init(|| {
        Regex::new(r"(?i)back|traseira|rear|environment").expect("rear-camera pattern is valid")
    });
    devices
        .iter()
        .find(|d| rear.is_match(&d.label))
        .or_else(|| devices.first())
}

struct ActiveStream<S: PayloadStream> {
    device: CameraDevice,
    stream: S,
}

impl<S: PayloadStream> Drop for ActiveStream<S> {
    fn drop(&mut self) {
        tracing::debug!(device = %self.device.id, "camera stopped");
        self.stream.stop();
    }
}

/// Owns the currently open stream, if any.
pub struct Camera<B: CameraBackend> {
    backend: B,
    active: Option<ActiveStream<B::Stream>>,
}

impl<B: CameraBackend> Camera<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    pub fn devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        self.backend.devices()
    }

    /// Open `device_id`, or the preferred device when `None`. Any stream
    /// already open is stopped first, even if opening the new one fails.
    pub fn start(&mut self, device_id: Option<&str>) -> Result<&CameraDevice, CameraError> {
        self.stop();

        let devices = self.backend.devices()?;
        let device = match device_id {
            Some(id) => devices.iter().find(|d| d.id == id || d.label == id),
            None => preferred_device(&devices),
        }
        .cloned()
        .ok_or(CameraError::NotFound)?;

        let stream = self.backend.open(&device)?;
        tracing::info!(device = %device.id, label = %device.label, "camera started");
        let active = self.active.insert(ActiveStream { device, stream });
        Ok(&active.device)
    }

    /// Move to another device.
    pub fn switch(&mut self, device_id: &str) -> Result<&CameraDevice, CameraError> {
        self.start(Some(device_id))
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_device(&self) -> Option<&CameraDevice> {
        self.active.as_ref().map(|a| &a.device)
    }

    /// Next payload from the open stream. `None` when nothing is open or the
    /// device closed. Cancel-safe.
    pub async fn next_payload(&mut self) -> Option<String> {
        match self.active.as_mut() {
            Some(active) => active.stream.next_payload().await,
            None => None,
        }
    }
}

impl<B: CameraBackend + std::fmt::Debug> std::fmt::Debug for Camera<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("backend", &self.backend)
            .field("active", &self.active_device())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockBackend;
    use super::*;

    fn device(id: &str, label: &str) -> CameraDevice {
        CameraDevice {
            id: id.into(),
            label: label.into(),
        }
    }

    #[test]
    fn prefers_rear_camera_by_label() {
        let devices = vec![
            device("0", "Front Camera"),
            device("1", "Câmera traseira 2"),
            device("2", "USB"),
        ];
        assert_eq!(preferred_device(&devices).unwrap().id, "1");

        let devices = vec![device("0", "facing ENVIRONMENT")];
        assert_eq!(preferred_device(&devices).unwrap().id, "0");
    }

    #[test]
    fn falls_back_to_first_device() {
        let devices = vec![device("0", "Integrated"), device("1", "USB")];
        assert_eq!(preferred_device(&devices).unwrap().id, "0");
        assert!(preferred_device(&[]).is_none());
    }

    #[test]
    fn start_picks_preferred_device() {
        let backend = MockBackend::with_devices(&[("0", "Front"), ("1", "Back")]);
        let mut camera = Camera::new(backend.clone());
        assert_eq!(camera.start(None).unwrap().id, "1");
        assert_eq!(backend.log(), vec!["open:1"]);
    }

    #[test]
    fn switch_stops_previous_stream_first() {
        let backend = MockBackend::with_devices(&[("0", "Front"), ("1", "Back")]);
        let mut camera = Camera::new(backend.clone());
        camera.start(None).unwrap();
        camera.switch("0").unwrap();
        assert_eq!(backend.log(), vec!["open:1", "stop:1", "open:0"]);
        assert_eq!(camera.active_device().unwrap().id, "0");
    }

    #[test]
    fn drop_stops_stream() {
        let backend = MockBackend::with_devices(&[("0", "Front")]);
        {
            let mut camera = Camera::new(backend.clone());
            camera.start(None).unwrap();
        }
        assert_eq!(backend.log(), vec!["open:0", "stop:0"]);
    }

    #[test]
    fn failed_switch_leaves_camera_stopped() {
        let backend = MockBackend::with_devices(&[("0", "Front"), ("1", "broken")]);
        let mut camera = Camera::new(backend.clone());
        camera.start(Some("0")).unwrap();
        assert!(matches!(camera.switch("1"), Err(CameraError::Busy)));
        assert!(!camera.is_active());
        assert_eq!(backend.log(), vec!["open:0", "stop:0"]);
    }

    #[test]
    fn no_devices_is_not_found() {
        let mut camera = Camera::new(MockBackend::default());
        assert!(matches!(camera.start(None), Err(CameraError::NotFound)));
        assert!(matches!(
            Camera::new(MockBackend::with_devices(&[("0", "Front")])).start(Some("9")),
            Err(CameraError::NotFound)
        ));
    }

    #[tokio::test]
    async fn reads_payloads_until_closed() {
        let backend = MockBackend::with_devices(&[("0", "Front")]);
        let tx = backend.feed();
        let mut camera = Camera::new(backend);
        camera.start(None).unwrap();

        tx.send("abc".into()).unwrap();
        drop(tx);
        assert_eq!(camera.next_payload().await.as_deref(), Some("abc"));
        assert_eq!(camera.next_payload().await, None);

        camera.stop();
        assert_eq!(camera.next_payload().await, None);
    }
}
