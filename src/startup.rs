//! Application startup and server initialization.
//!
//! Builds the shared state (HTTP client, metrics) from the configuration
//! and serves the router until the process is stopped.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;
use crate::upstream::build_client;

/// Builds the state shared by every request handler.
pub fn build_state(config: Arc<Config>) -> Result<AppState, Box<dyn std::error::Error>> {
    let http = build_client(&config.upstream)?;
    let metrics = Metrics::new()?;
    Ok(AppState {
        config,
        http,
        metrics,
    })
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the server fails to
/// bind to the configured address, or serving fails.
pub async fn run(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    if config.credentials().is_none() {
        warn!(
            event_name = "startup.credentials.missing",
            event_domain = "startup",
            "TURNSTILE_SECRET, ONEPASS_ID or ONEPASS_SECRET is not set; every lookup will be rejected"
        );
    }
    if config.turnstile_allowed_hostnames.is_empty() {
        warn!(
            event_name = "startup.allowlist.empty",
            event_domain = "startup",
            "TURNSTILE_ALLOWED_HOSTNAMES is empty; every lookup will be rejected"
        );
    }

    info!(
        environment = config.environment.as_deref().unwrap_or("unset"),
        onepass_base_url = config.onepass_base_url(),
        allowed_hostnames = ?config.turnstile_allowed_hostnames,
        "Starting server on {}",
        config.bind_address
    );

    let state = build_state(config.clone())?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
