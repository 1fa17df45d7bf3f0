//! # Checker Session Subcommands
//!
//! `login`, `logout`, and `whoami`. The session token lives in the station
//! profile. When the station has no gate yet, the gate the organizer
//! assigned to the checker is adopted from their profile.

use anyhow::Result;
use clap::Args;
use zeroize::Zeroizing;

use gatepass_client::checkers::CheckerLoginRequest;
use gatepass_client::GatepassClient;
use gatepass_scanner::{StationProfile, StationStore};

use crate::{Context, EXIT_NOT_ADMITTED, EXIT_OK, EXIT_REAUTH};

/// Arguments for `gatepass login`.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username or email.
    #[arg(long, short)]
    pub user: String,

    /// Password.
    #[arg(long, env = "GATEPASS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Execute `gatepass login`.
pub async fn run_login(args: &LoginArgs, ctx: &Context) -> Result<u8> {
    let password = Zeroizing::new(args.password.clone());
    let mut profile = ctx.load_profile()?;
    profile.set_token(None);
    let client = ctx.client(&profile)?;

    let token = match client
        .checkers()
        .login(&CheckerLoginRequest {
            user: &args.user,
            password: password.as_str(),
        })
        .await
    {
        Ok(token) => token,
        Err(e) if e.is_unauthorized() => {
            println!("FAIL: usuário ou senha inválidos");
            return Ok(EXIT_NOT_ADMITTED);
        }
        Err(e) => return Err(e.into()),
    };

    profile.set_token(Some(token.as_str()));
    ctx.store.save(&profile)?;
    tracing::info!(user = %args.user, "checker logged in");

    let client = ctx.client(&profile)?;
    let who = match client.checkers().me().await {
        Ok(me) => {
            adopt_gate(&ctx.store, &mut profile, me.gate.as_deref());
            me.display_name()
        }
        Err(e) => {
            tracing::debug!(error = %e, "checker profile unavailable");
            String::new()
        }
    };

    if who.is_empty() {
        println!("OK: logged in as {}", args.user);
    } else {
        println!("OK: logged in as {who}");
    }
    if let Some(gate) = profile.gate() {
        println!("  Gate: {gate}");
    }
    Ok(EXIT_OK)
}

/// Execute `gatepass logout`.
pub fn run_logout(ctx: &Context) -> Result<u8> {
    ctx.store.update(|p| p.set_token(None))?;
    println!("OK: logged out");
    Ok(EXIT_OK)
}

/// Execute `gatepass whoami`.
pub async fn run_whoami(ctx: &Context) -> Result<u8> {
    let mut profile = ctx.load_profile()?;
    if !profile.is_logged_in() {
        println!("Não autenticado. Use `gatepass login`.");
        return Ok(EXIT_REAUTH);
    }

    let client = ctx.client(&profile)?;
    let me = match client.checkers().me().await {
        Ok(me) => me,
        Err(e) if e.is_unauthorized() => {
            expire_session(&ctx.store)?;
            return Ok(EXIT_REAUTH);
        }
        Err(e) => return Err(e.into()),
    };

    adopt_gate(&ctx.store, &mut profile, me.gate.as_deref());

    println!("Checker: {}", me.display_name());
    if let Some(gate) = me.gate.as_deref() {
        println!("  Assigned gate: {gate}");
    }
    match profile.gate() {
        Some(gate) => println!("  Station gate: {gate}"),
        None => println!("  Station gate: (not set)"),
    }
    Ok(EXIT_OK)
}

/// Fill an empty station gate from the checker profile, if logged in.
pub async fn prefill_gate(client: &GatepassClient, store: &StationStore, profile: &mut StationProfile) {
    if profile.gate().is_some() || !profile.is_logged_in() {
        return;
    }
    match client.checkers().me().await {
        Ok(me) => adopt_gate(store, profile, me.gate.as_deref()),
        Err(e) => tracing::debug!(error = %e, "could not fetch checker profile"),
    }
}

/// Forget the stored session after the authority rejected it.
pub fn expire_session(store: &StationStore) -> Result<()> {
    store.update(|p| p.set_token(None))?;
    println!("Sessão expirada. Faça login novamente.");
    Ok(())
}

fn adopt_gate(store: &StationStore, profile: &mut StationProfile, gate: Option<&str>) {
    if profile.gate().is_some() {
        return;
    }
    let Some(gate) = gate.filter(|g| !g.trim().is_empty()) else {
        return;
    };
    profile.set_gate(Some(gate));
    match store.save(profile) {
        Ok(()) => tracing::info!(gate = gate.trim(), "station gate set from checker profile"),
        Err(e) => tracing::warn!(error = %e, "could not save station gate"),
    }
}
