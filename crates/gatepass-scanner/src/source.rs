//! # Payload Sources
//!
//! Concrete [`CameraBackend`]s for a gate station:
//!
//! - [`CommandBackend`] lists V4L2 devices and runs an external QR decoder
//!   (`zbarcam` by default) against the chosen one, reading one payload per
//!   line of its output.
//! - [`StdinBackend`] reads payloads line by line from standard input, for
//!   handheld scanners in keyboard-wedge mode and for piping.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, Command};

use crate::camera::{CameraBackend, CameraDevice, PayloadStream};
use crate::error::CameraError;

/// Default external decoder.
pub const DEFAULT_DECODER: &str = "zbarcam";

/// Decoder arguments placed before the device path: bare payloads, no window.
pub const DEFAULT_DECODER_ARGS: &[&str] = &["--raw", "--nodisplay"];

/// One payload per line from any async reader, optionally tied to the child
/// process producing it.
pub struct LineStream<R> {
    lines: Lines<R>,
    child: Option<Child>,
    stopped: bool,
}

impl<R: AsyncBufRead + Unpin + Send> LineStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            child: None,
            stopped: false,
        }
    }

    fn with_child(reader: R, child: Child) -> Self {
        Self {
            child: Some(child),
            ..Self::new(reader)
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> PayloadStream for LineStream<R> {
    fn next_payload(&mut self) -> impl Future<Output = Option<String>> + Send {
        let stopped = self.stopped;
        let lines = &mut self.lines;
        async move {
            if stopped {
                return None;
            }
            match lines.next_line().await {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "payload source read failed");
                    None
                }
            }
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(error = %e, "decoder already exited");
            }
        }
    }
}

/// Payloads typed or piped on standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinBackend;

impl CameraBackend for StdinBackend {
    type Stream = LineStream<BufReader<tokio::io::Stdin>>;

    fn devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        Ok(vec![CameraDevice {
            id: "stdin".into(),
            label: "standard input".into(),
        }])
    }

    fn open(&self, _device: &CameraDevice) -> Result<Self::Stream, CameraError> {
        Ok(LineStream::new(BufReader::new(tokio::io::stdin())))
    }
}

/// V4L2 devices read through an external decoder process.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    dev_dir: PathBuf,
    sysfs_dir: PathBuf,
}

impl Default for CommandBackend {
    fn default() -> Self {
        Self::new(
            DEFAULT_DECODER,
            DEFAULT_DECODER_ARGS.iter().map(|a| a.to_string()).collect(),
        )
    }
}

impl CommandBackend {
    /// `program args.. <device>` is run for each opened device.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            dev_dir: PathBuf::from("/dev"),
            sysfs_dir: PathBuf::from("/sys/class/video4linux"),
        }
    }

    /// Enumerate devices under other roots than `/dev` and sysfs.
    pub fn with_roots(mut self, dev_dir: impl Into<PathBuf>, sysfs_dir: impl Into<PathBuf>) -> Self {
        self.dev_dir = dev_dir.into();
        self.sysfs_dir = sysfs_dir.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CameraBackend for CommandBackend {
    type Stream = LineStream<BufReader<tokio::process::ChildStdout>>;

    fn devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        let entries = match std::fs::read_dir(&self.dev_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CameraError::from_io(&e)),
        };

        let mut devices: Vec<CameraDevice> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if !name.starts_with("video") {
                    return None;
                }
                let label = std::fs::read_to_string(self.sysfs_dir.join(&name).join("name"))
                    .ok()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| name.clone());
                Some(CameraDevice {
                    id: entry.path().to_string_lossy().into_owned(),
                    label,
                })
            })
            .collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(devices)
    }

    fn open(&self, device: &CameraDevice) -> Result<Self::Stream, CameraError> {
        // Surface permission and busy errors before the decoder hides them.
        std::fs::File::open(&device.id).map_err(|e| CameraError::from_io(&e))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&device.id)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CameraError::Unsupported(self.program.clone()),
                _ => CameraError::from_io(&e),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CameraError::Other("decoder stdout unavailable".into()))?;
        tracing::debug!(program = %self.program, device = %device.id, "decoder spawned");
        Ok(LineStream::with_child(BufReader::new(stdout), child))
    }
}
