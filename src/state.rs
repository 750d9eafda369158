//! Shared application state.
//!
//! Everything here is read-only once the server is running, so requests
//! never coordinate with each other.

use crate::config::Config;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<Config>,
    /// Outbound HTTP client, shared for its connection pool.
    pub http: reqwest::Client,
    /// Prometheus metrics registry.
    pub metrics: Metrics,
}
