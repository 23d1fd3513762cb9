//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay handler on every path
//! - Wire up middleware (tracing, request ID, header defaults, panics)
//!
//! The request timeout is enforced by the relay handler so that it surfaces
//! as a plain-text 500 like every other failure.
//! - Bind server to listener
//! - Stop on the shutdown broadcast and drain in-flight requests

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::response::{cors_headers, panic_response, NO_STORE};
use crate::relay::{relay_handler, RelayState};

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let state = RelayState::new(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: RelayState) -> Router {
        // The handler sets these itself; the layers cover responses produced
        // by middleware (caught panics).
        let [origin, allow_headers, allow_methods] = cors_headers();

        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(SetResponseHeaderLayer::if_not_present(origin.0, origin.1))
            .layer(SetResponseHeaderLayer::if_not_present(allow_headers.0, allow_headers.1))
            .layer(SetResponseHeaderLayer::if_not_present(allow_methods.0, allow_methods.1))
            .layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static(NO_STORE),
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            model = %self.config.upstream.model,
            credential_configured = self.config.upstream.api_key.is_some(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
