//! # Scan Loop
//!
//! Pumps payloads from an open [`Camera`] into a shared [`ScanController`].
//!
//! Each payload is submitted on its own task so that reading never waits on
//! the network: while one request is in flight, the frames read behind it
//! reach the controller immediately and are dropped there instead of piling
//! up in the decoder's output pipe.

use std::future::Future;
use std::sync::Arc;

use gatepass_client::ValidationAuthority;
use tokio::task::JoinSet;

use crate::camera::{Camera, CameraBackend};
use crate::controller::{Disposition, ScanController};

/// Why [`run_scan_loop`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanLoopExit {
    /// The shutdown future resolved.
    Shutdown,
    /// The camera closed and every pending submission settled.
    SourceClosed,
    /// The authority rejected the session; scanning stopped.
    ReauthRequired,
}

/// Run until shutdown, source exhaustion, or a session rejection.
///
/// `on_disposition` sees every settled submission, dropped ones included, in
/// settlement order. The camera is stopped on every exit path.
pub async fn run_scan_loop<A, B, F>(
    controller: Arc<ScanController<A>>,
    camera: &mut Camera<B>,
    shutdown: impl Future<Output = ()>,
    mut on_disposition: F,
) -> ScanLoopExit
where
    A: ValidationAuthority + 'static,
    B: CameraBackend,
    F: FnMut(Disposition),
{
    tokio::pin!(shutdown);
    let mut tasks: JoinSet<Disposition> = JoinSet::new();
    let mut source_open = camera.is_active();

    let exit = loop {
        // The shutdown branch never disables itself, so exhaustion is checked here.
        if !source_open && tasks.is_empty() {
            break ScanLoopExit::SourceClosed;
        }
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!(pending = tasks.len(), "scan loop shutting down");
                tasks.abort_all();
                break ScanLoopExit::Shutdown;
            }
            payload = camera.next_payload(), if source_open => match payload {
                Some(payload) => {
                    let controller = controller.clone();
                    tasks.spawn(async move { controller.submit(&payload).await });
                }
                None => {
                    tracing::info!("payload source closed");
                    source_open = false;
                }
            },
            Some(joined) = tasks.join_next() => match joined {
                Ok(Disposition::ReauthRequired) => {
                    tasks.abort_all();
                    on_disposition(Disposition::ReauthRequired);
                    break ScanLoopExit::ReauthRequired;
                }
                Ok(disposition) => on_disposition(disposition),
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::error!(error = %e, "submission task failed"),
            },
        }
    };

    camera.stop();
    exit
}
