//! # Validate Subcommand
//!
//! One-shot validation of a single payload, through the same controller the
//! scan loop uses, so a missing gate is refused locally and a rejected
//! session clears the stored token.

use std::io::Write;

use anyhow::{bail, Context as _, Result};
use clap::{ArgGroup, Args};

use gatepass_core::deep_link_payload;
use gatepass_scanner::{Disposition, DropReason, ScanController, ScanSettings};

use crate::present::Presenter;
use crate::{auth, exit_code, station_for, Context, EXIT_REAUTH};

/// Arguments for the `gatepass validate` subcommand.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["payload", "link"])))]
pub struct ValidateArgs {
    /// Scanned QR payload: validator URL, ticket id, or signed token.
    #[arg(value_name = "PAYLOAD")]
    pub payload: Option<String>,

    /// Deep link to the validator page; its `id` parameter is validated.
    #[arg(long)]
    pub link: Option<String>,

    /// Gate for this validation, overriding the stored one.
    #[arg(long)]
    pub gate: Option<String>,

    /// Device label for this validation, overriding the stored one.
    #[arg(long)]
    pub device: Option<String>,

    /// Print the outcome as JSON instead of a banner.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 valid, 2 not admitted, 3 login required.
pub async fn run_validate(args: &ValidateArgs, ctx: &Context) -> Result<u8> {
    let payload = match (&args.payload, &args.link) {
        (Some(payload), _) => payload.clone(),
        (None, Some(link)) => deep_link_payload(link)
            .with_context(|| format!("no ticket id in link: {link}"))?,
        (None, None) => bail!("nothing to validate"),
    };

    let mut profile = ctx.load_profile()?;
    let client = ctx.client(&profile)?;
    auth::prefill_gate(&client, &ctx.store, &mut profile).await;

    let station = station_for(&profile, args.gate.as_deref(), args.device.as_deref());
    let controller = ScanController::new(client, station, ScanSettings::default());

    match controller.submit(&payload).await {
        Disposition::Completed(outcome) | Disposition::Rejected(outcome) => {
            if args.json {
                let mut out = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut out, &outcome)?;
                writeln!(out)?;
            } else {
                Presenter::new(std::io::stdout().lock(), ctx.offset, ctx.bell).outcome(&outcome)?;
            }
            Ok(exit_code(outcome.status))
        }
        Disposition::ReauthRequired => {
            auth::expire_session(&ctx.store)?;
            Ok(EXIT_REAUTH)
        }
        Disposition::Dropped(DropReason::Empty) => bail!("payload is empty"),
        Disposition::Dropped(reason) => bail!("payload dropped: {reason:?}"),
    }
}
