//! # Station Subcommand
//!
//! Shows and edits the persisted station profile.

use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};

use crate::{Context, EXIT_OK};

/// Arguments for the `gatepass station` subcommand.
#[derive(Args, Debug)]
pub struct StationArgs {
    #[command(subcommand)]
    pub command: StationCommand,
}

/// Station subcommands.
#[derive(Subcommand, Debug)]
pub enum StationCommand {
    /// Show gate, device, and session status.
    Show,

    /// Set the gate and/or device label. A blank value clears it.
    #[command(group(ArgGroup::new("fields").required(true).multiple(true).args(["gate", "device"])))]
    Set {
        /// Gate (portão) this station validates at.
        #[arg(long)]
        gate: Option<String>,
        /// Label for this device.
        #[arg(long)]
        device: Option<String>,
    },

    /// Forget gate and device. The session is kept.
    Clear,
}

/// Execute the station subcommand.
pub fn run_station(args: &StationArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        StationCommand::Show => cmd_show(ctx),
        StationCommand::Set { gate, device } => {
            let profile = ctx.store.update(|p| {
                if let Some(gate) = gate {
                    p.set_gate(Some(gate.as_str()));
                }
                if let Some(device) = device {
                    p.set_device(Some(device.as_str()));
                }
            })?;
            println!("OK: station updated");
            print_fields(&profile);
            Ok(EXIT_OK)
        }
        StationCommand::Clear => {
            ctx.store.update(|p| {
                p.set_gate(None);
                p.set_device(None);
            })?;
            println!("OK: station cleared");
            Ok(EXIT_OK)
        }
    }
}

fn cmd_show(ctx: &Context) -> Result<u8> {
    let profile = ctx.load_profile()?;
    println!("Station: {}", ctx.store.path().display());
    print_fields(&profile);
    println!(
        "  Session: {}",
        if profile.is_logged_in() {
            "logged in"
        } else {
            "not logged in"
        }
    );
    println!("  API: {}", ctx.api.base_url);
    Ok(EXIT_OK)
}

fn print_fields(profile: &gatepass_scanner::StationProfile) {
    match profile.gate() {
        Some(gate) => println!("  Gate: {gate}"),
        None => println!("  Gate: (not set)"),
    }
    match profile.device() {
        Some(device) => println!("  Device: {device}"),
        None => println!("  Device: (not set)"),
    }
}
