//! HTTP transport for the Cravey enricher.
//!
//! Accepts CSV text over JSON, runs it through a [`cravey_core::CsvProcessor`]
//! inside a scoped temporary directory, and returns the enriched CSV. Also
//! serves a static health check and answers CORS preflights for any origin.

pub mod config;
mod middleware;
pub mod routes;
pub mod scratch;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use cravey_shared::{CraveyError, Result};

pub use config::{CorsPolicy, ServerConfig};
pub use routes::router;

/// Bind `config.addr` and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|e| CraveyError::Server(format!("failed to bind {}: {e}", config.addr)))?;

    serve_on(listener, config, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| CraveyError::Server(format!("listener has no local address: {e}")))?;
    info!(addr = %local, version = %config.version, "enrichment server listening");

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CraveyError::Server(e.to_string()))?;

    info!("enrichment server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
