//! # gatepass CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, Offset, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gatepass_cli::auth::{run_login, run_logout, run_whoami, LoginArgs};
use gatepass_cli::scan::{run_cameras, run_scan, CamerasArgs, ScanArgs};
use gatepass_cli::station::{run_station, StationArgs};
use gatepass_cli::validate::{run_validate, ValidateArgs};
use gatepass_cli::{Context, EXIT_FAILURE};
use gatepass_client::ValidatorApiConfig;
use gatepass_scanner::StationStore;

/// gatepass -- ticket validation at the gate
///
/// Scans QR tickets and asks the ticketing backend whether to let the holder
/// in. The API root comes from GATEPASS_API_URL.
#[derive(Parser, Debug)]
#[command(name = "gatepass", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Station profile file.
    #[arg(long, global = true, env = "GATEPASS_STATION_FILE")]
    station_file: Option<PathBuf>,

    /// Show times in UTC instead of local time.
    #[arg(long, global = true)]
    utc: bool,

    /// Do not ring the terminal bell on results.
    #[arg(long, global = true)]
    silent: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one scanned payload or validator link.
    Validate(ValidateArgs),

    /// Scan continuously from a camera or standard input.
    Scan(ScanArgs),

    /// Show or change the stored gate and device.
    Station(StationArgs),

    /// Log a checker in and store the session.
    Login(LoginArgs),

    /// Forget the stored session.
    Logout,

    /// Show the logged-in checker.
    Whoami,

    /// List video devices usable for scanning.
    Cameras(CamerasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "gatepass starting");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("cannot start async runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let result = runtime.block_on(dispatch(cli));
    // A pending stdin read must not hold the process open.
    runtime.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn dispatch(cli: Cli) -> Result<u8> {
    if let Commands::Cameras(args) = &cli.command {
        return run_cameras(args);
    }

    let ctx = context(&cli)?;
    tracing::debug!(station_file = %ctx.store.path().display(), api = %ctx.api.base_url, "resolved context");

    match &cli.command {
        Commands::Validate(args) => run_validate(args, &ctx).await,
        Commands::Scan(args) => run_scan(args, &ctx).await,
        Commands::Station(args) => run_station(args, &ctx),
        Commands::Login(args) => run_login(args, &ctx).await,
        Commands::Logout => run_logout(&ctx),
        Commands::Whoami => run_whoami(&ctx).await,
        Commands::Cameras(args) => run_cameras(args),
    }
}

fn context(cli: &Cli) -> Result<Context> {
    let store = match &cli.station_file {
        Some(path) => StationStore::new(path),
        None => StationStore::from_env()?,
    };
    let offset = if cli.utc {
        Utc.fix()
    } else {
        Local::now().offset().fix()
    };
    Ok(Context {
        store,
        api: ValidatorApiConfig::from_env()?,
        offset,
        bell: !cli.silent,
    })
}
