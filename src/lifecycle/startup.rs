//! Startup orchestration.
//!
//! Fail fast: any startup error is fatal. The listener binds last, so
//! traffic only arrives once everything else is ready.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Start every subsystem and serve until a shutdown signal arrives.
pub async fn run(config: RelayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        model = %config.upstream.model,
        transport = ?config.upstream.credential_transport,
        upstream_timeout_secs = config.upstream.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.upstream.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; relay requests will fail until it is");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
