//! # Scan Subcommand
//!
//! Continuous scanning from a camera (through an external QR decoder) or
//! from standard input, until Ctrl-C, end of input, or an expired session.
//! The last few results are printed on the way out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use gatepass_client::GatepassClient;
use gatepass_scanner::source::{DEFAULT_DECODER, DEFAULT_DECODER_ARGS};
use gatepass_scanner::{
    preferred_device, run_scan_loop, Camera, CameraBackend, CommandBackend, ScanController,
    ScanLoopExit, ScanSettings, StdinBackend,
};

use crate::present::Presenter;
use crate::{auth, station_for, Context, EXIT_FAILURE, EXIT_OK, EXIT_REAUTH};

/// Arguments for the `gatepass scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Read payloads line by line from standard input instead of a camera.
    #[arg(long, conflicts_with = "camera")]
    pub stdin: bool,

    /// Camera device path or label. Defaults to the rear-facing camera.
    #[arg(long)]
    pub camera: Option<String>,

    /// QR decoder program run against the camera device.
    #[arg(long, default_value = DEFAULT_DECODER)]
    pub decoder_cmd: String,

    /// Argument passed to the decoder before the device path (repeatable).
    #[arg(long = "decoder-arg", allow_hyphen_values = true)]
    pub decoder_args: Vec<String>,

    /// Gate for this session, overriding the stored one.
    #[arg(long)]
    pub gate: Option<String>,

    /// Device label for this session, overriding the stored one.
    #[arg(long)]
    pub device: Option<String>,

    /// Ignore the same payload seen again within this many milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub duplicate_window_ms: u64,

    /// Pause after each result before accepting the next scan.
    #[arg(long, default_value_t = 400)]
    pub cooldown_ms: u64,

    /// Give up on a validation after this many seconds.
    #[arg(long, default_value_t = 8)]
    pub request_timeout_secs: u64,
}

impl ScanArgs {
    fn settings(&self) -> ScanSettings {
        ScanSettings {
            duplicate_window: Duration::from_millis(self.duplicate_window_ms),
            cooldown: Duration::from_millis(self.cooldown_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    fn decoder(&self) -> CommandBackend {
        let args = if self.decoder_args.is_empty() {
            DEFAULT_DECODER_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            self.decoder_args.clone()
        };
        CommandBackend::new(&self.decoder_cmd, args)
    }
}

/// Execute the scan subcommand.
///
/// Returns exit code: 0 after Ctrl-C or end of input, 3 if the session expired.
pub async fn run_scan(args: &ScanArgs, ctx: &Context) -> Result<u8> {
    let mut profile = ctx.load_profile()?;
    let client = ctx.client(&profile)?;
    auth::prefill_gate(&client, &ctx.store, &mut profile).await;

    let station = station_for(&profile, args.gate.as_deref(), args.device.as_deref());
    if station.gate.is_none() {
        tracing::warn!("no gate configured; scans will be refused until one is set");
    }
    let controller = Arc::new(ScanController::new(client, station, args.settings()));

    let mut presenter = Presenter::new(std::io::stdout().lock(), ctx.offset, ctx.bell);
    let exit = if args.stdin {
        scan_with(StdinBackend, None, controller.clone(), &mut presenter).await?
    } else {
        scan_with(
            args.decoder(),
            args.camera.as_deref(),
            controller.clone(),
            &mut presenter,
        )
        .await?
    };

    presenter.history(&controller.history())?;

    match exit {
        ScanLoopExit::Shutdown | ScanLoopExit::SourceClosed => Ok(EXIT_OK),
        ScanLoopExit::ReauthRequired => {
            auth::expire_session(&ctx.store)?;
            Ok(EXIT_REAUTH)
        }
    }
}

async fn scan_with<B, W>(
    backend: B,
    camera_id: Option<&str>,
    controller: Arc<ScanController<GatepassClient>>,
    presenter: &mut Presenter<W>,
) -> Result<ScanLoopExit>
where
    B: CameraBackend,
    W: std::io::Write,
{
    let mut camera = Camera::new(backend);
    let device = camera.start(camera_id)?;
    eprintln!("Lendo de {} ({}). Ctrl-C para sair.", device.label, device.id);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    Ok(run_scan_loop(controller, &mut camera, shutdown, |disposition| {
        if let Err(e) = presenter.disposition(&disposition) {
            tracing::warn!(error = %e, "cannot write result");
        }
    })
    .await)
}

/// Arguments for the `gatepass cameras` subcommand.
#[derive(Args, Debug)]
pub struct CamerasArgs {
    /// QR decoder program that would be used for scanning.
    #[arg(long, default_value = DEFAULT_DECODER)]
    pub decoder_cmd: String,
}

/// Execute the cameras subcommand. The preferred device is marked with `*`.
pub fn run_cameras(args: &CamerasArgs) -> Result<u8> {
    let backend = CommandBackend::new(&args.decoder_cmd, Vec::new());
    let devices = backend.devices()?;
    if devices.is_empty() {
        println!("Nenhuma câmera encontrada.");
        return Ok(EXIT_FAILURE);
    }

    let preferred = preferred_device(&devices).map(|d| d.id.clone());
    println!("Cameras ({}):", devices.len());
    for device in &devices {
        let mark = if preferred.as_deref() == Some(device.id.as_str()) {
            '*'
        } else {
            ' '
        };
        println!(" {mark} {}  {}", device.id, device.label);
    }
    Ok(EXIT_OK)
}
