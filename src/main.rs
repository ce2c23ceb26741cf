//! Access Gate - request authentication in front of an HTTP service
//!
//! Paths under configured prefixes require either the process-wide
//! master token or a per-client access token; everything else passes.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod error;
mod logging;

use crate::api::build_router;
use crate::auth::{AccessGate, StaticDirectory};
use crate::config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configured clients, also backing the gate's credential lookup.
    pub directory: StaticDirectory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Access Gate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    config.auth.validate().map_err(|e| {
        tracing::error!(error = %e, "Invalid auth configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        master_paths = ?config.auth.master_paths,
        access_token_paths = ?config.auth.access_token_paths,
        "Configuration loaded"
    );

    // Build the credential directory and the gate
    let directory = StaticDirectory::new(config.auth.clients.clone());
    let gate = AccessGate::new(&config.auth, Arc::new(directory.clone()));

    tracing::info!(clients = directory.len(), "Credential directory ready");

    if config.auth.master_paths.is_empty() && config.auth.access_token_paths.is_empty() {
        tracing::warn!("No protected paths configured - every request will pass");
    }
    if !config.auth.access_token_paths.is_empty() && directory.is_empty() {
        tracing::warn!("Access-token paths configured but no clients - those paths will always reject");
    }

    let state = AppState { directory };

    // Build router
    let app = build_router(state, gate);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
