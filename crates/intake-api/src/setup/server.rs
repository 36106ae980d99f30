//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use intake_core::Config;
use std::net::SocketAddr;

/// Bind the configured port and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind intake API to {}", addr))?;

    tracing::info!(
        addr = %addr,
        store_configured = config.store().api_key.is_some(),
        content_host_configured = config.content_host().token.is_some(),
        max_transport_bytes = config.max_transport_bytes(),
        max_store_bytes = config.max_store_bytes(),
        match_strategy = ?config.policy().match_strategy,
        "Intake API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Intake API server error")?;

    tracing::info!("Intake API stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, draining in-flight requests"),
        _ = terminate => tracing::info!("Received SIGTERM, draining in-flight requests"),
    }
}
