//! HTTP boundary for version lookups
//!
//! A single endpoint: `GET /` or `GET /<tag>` with optional `tag`,
//! `security`, `platform`, `arch` and `format` query parameters.
//!
//! # Modules
//!
//! - [`handler`]: query parsing, content negotiation, and response shaping
//! - [`error`]: mapping of lookup failures to 5xx responses

pub mod error;
pub mod handler;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServiceConfig;
use crate::service::LookupService;

/// Build the router for the lookup endpoint
pub fn router(service: LookupService) -> Router {
    Router::new()
        .route("/", get(handler::lookup_root))
        .route("/*tag", get(handler::lookup_path))
        .with_state(Arc::new(service))
}

/// Bind the configured address and serve lookups until Ctrl-C
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let service = LookupService::from_config(&config.catalogs)?;
    let app = router(service);

    let listener = TcpListener::bind(&config.server.bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
