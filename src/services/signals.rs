//! Signal bridge: OS signals become supervisor events.
//!
//! Nothing here mutates shared state. The listener task translates the
//! first SIGTERM or SIGINT into one `TerminateRequested` event on the
//! channel; the dispatch loop does everything else. Child exits never
//! pass through here at all, the per-worker waiters in the spawner cover
//! that side.

use crate::services::supervisor::SupervisorHandle;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Listen for SIGTERM/SIGINT and post one terminate request.
pub fn spawn_terminate_listener(supervisor: SupervisorHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };
        let mut interrupt = match signal(SignalKind::interrupt()) {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "Failed to install SIGINT handler");
                return;
            }
        };

        tokio::select! {
            _ = terminate.recv() => info!("SIGTERM received"),
            _ = interrupt.recv() => info!("SIGINT received"),
        }

        supervisor.terminate().await;
    })
}
