#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use figment::providers::{Format, Yaml};
use figment::Figment;
use serde_json::Value;
use turnpass::config::Config;
use turnpass::routes::create_router;
use turnpass::startup::build_state;

pub const ALLOWED_ORIGIN: &str = "https://example.com";
pub const MEMBER_PATH: &str = "/api/members/code/";

/// Config with every credential set and all upstreams pointing at `mock_url`.
pub fn build_config(mock_url: &str) -> Config {
    parse_config(&format!(
        r#"
environment: staging
turnstile_allowed_hostnames: "example.com,localhost"
turnstile_secret: ts-secret
onepass_id: op-id
onepass_secret: op-secret
logging:
  level: warn
  format: json
upstream:
  turnstile_verify_url: "{mock_url}/siteverify"
  onepass_production_url: "{mock_url}/production"
  onepass_staging_url: "{mock_url}"
  onepass_scope: "https://api.example.com/.default"
  member_lookup_path: "{MEMBER_PATH}"
  timeout_in_ms: 3000
"#
    ))
}

pub fn parse_config(yaml: &str) -> Config {
    Figment::new()
        .merge(Yaml::string(yaml))
        .extract()
        .expect("Failed to parse integration test config")
}

pub fn build_app(config: Config) -> Router {
    let state = build_state(Arc::new(config)).expect("state should build");
    create_router(state)
}

pub fn lookup_request(origin: Option<&str>, token: &str) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/");
    if let Some(origin) = origin {
        builder = builder.header("Origin", origin);
    }
    builder
        .body(Body::from(token.to_string()))
        .expect("failed to build request")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
