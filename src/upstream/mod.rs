//! Clients for the services a lookup talks to.
//!
//! Each call is a single attempt. The functions here report what went wrong
//! as an error; deciding whether that error rejects the lookup or is folded
//! into a default is left to the gateway pipeline.

pub mod onepass;
pub mod turnstile;

use std::time::Duration;

use reqwest::Client;

use crate::config::UpstreamConfig;

/// Builds the HTTP client shared by every request, bounded by the configured timeout.
pub fn build_client(config: &UpstreamConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_in_ms))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
