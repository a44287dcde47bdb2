//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use medias_core::Config;

/// Start the server. After Ctrl+C or SIGTERM, in-flight requests get `SHUTDOWN_TIMEOUT_SECS`
/// to drain before the server is dropped.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        request_timeout_secs = config.request_timeout().as_secs(),
        shutdown_timeout_secs = config.shutdown_timeout().as_secs(),
        "Server ready and accepting connections"
    );

    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signal_tx.send(());
    });
    let mut server = tokio::spawn(async move { serve.await });

    // Resolves on a shutdown signal, or with an error if the server stopped on its own.
    let _ = signal_rx.await;

    match tokio::time::timeout(config.shutdown_timeout(), &mut server).await {
        Ok(joined) => {
            joined.context("Server task panicked")??;
            tracing::info!("Server stopped");
        }
        Err(_) => {
            tracing::warn!(
                shutdown_timeout_secs = config.shutdown_timeout().as_secs(),
                "Shutdown timeout elapsed; dropping in-flight requests"
            );
            server.abort();
        }
    }

    Ok(())
}

/// Listens for Ctrl+C (SIGINT) and SIGTERM signals to initiate graceful shutdown.
async fn shutdown_signal() {
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

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
