//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C), SIGTERM, or an in-process shutdown request
//! - Resolve once, whichever comes first
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A signal that cannot be installed is logged and ignored, not fatal

use tokio::sync::broadcast;

/// Resolves when the process should stop serving.
pub async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let requested = async {
        // A closed channel means nobody can ask for shutdown anymore.
        if shutdown.recv().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received"),
        _ = terminate => tracing::info!("SIGTERM received"),
        _ = requested => tracing::info!("Shutdown requested in-process"),
    }
}
