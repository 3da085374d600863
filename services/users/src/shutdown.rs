//! Graceful shutdown trigger

use std::{future::Future, io};

use tracing::{error, info};

/// Resolve once `signal` fires.
///
/// If the signal handler could not be installed the error is logged and
/// the future never resolves, so the server keeps running instead of
/// shutting down immediately.
pub async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Wait for Ctrl+C
pub async fn ctrl_c() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}
