//! Server lifecycle: bind → serve until Ctrl-C.

use std::io;

use tokio::net::TcpListener;

use crate::router::app;
use crate::AppState;

/// Bind the listener for `addr` (`host:port`).
pub async fn bind(addr: &str) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Rehab portal listening");
    Ok(listener)
}

/// Serve the portal on `listener` until a shutdown signal arrives.
pub async fn run(listener: TcpListener, state: AppState) -> io::Result<()> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Rehab portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Unable to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
