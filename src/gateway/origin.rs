use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use http::{HeaderMap, HeaderValue};
use reqwest::Url;

use crate::config::Config;
use crate::state::AppState;

/// The caller's declared origin and the hostname parsed out of it.
///
/// A missing or malformed `Origin` header yields an empty hostname, which no
/// allow-list entry can match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub header: Option<HeaderValue>,
    pub hostname: String,
}

impl RequestOrigin {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = headers.get(ORIGIN).cloned();
        let hostname = header
            .as_ref()
            .and_then(|value| value.to_str().ok())
            .map(origin_hostname)
            .unwrap_or_default();
        RequestOrigin { header, hostname }
    }

    pub fn is_allowed(&self, config: &Config) -> bool {
        config.is_allowed_hostname(&self.hostname)
    }
}

/// Hostname portion of an origin such as `https://example.com:8443`.
pub fn origin_hostname(origin: &str) -> String {
    Url::parse(origin)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Sets the CORS headers on every response of the routes it wraps.
///
/// `Access-Control-Allow-Origin` echoes the caller's origin only when its
/// hostname is allowed; otherwise it is left out.
pub async fn origin_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = RequestOrigin::from_headers(request.headers());
    let allowed = origin.is_allowed(&state.config);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    if allowed {
        if let Some(value) = origin.header {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allowed: &[&str]) -> Config {
        serde_json::from_value(serde_json::json!({ "turnstile_allowed_hostnames": allowed }))
            .expect("config should parse")
    }

    fn allowed() -> Config {
        config(&["example.com", "localhost"])
    }

    fn origin(value: &str) -> RequestOrigin {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_str(value).unwrap());
        RequestOrigin::from_headers(&headers)
    }

    #[test]
    fn hostname_drops_scheme_and_port() {
        assert_eq!(origin_hostname("https://example.com"), "example.com");
        assert_eq!(origin_hostname("http://localhost:8787"), "localhost");
        assert_eq!(origin_hostname("https://EXAMPLE.com/"), "example.com");
    }

    #[test]
    fn malformed_origins_yield_empty_hostname() {
        assert_eq!(origin_hostname(""), "");
        assert_eq!(origin_hostname("null"), "");
        assert_eq!(origin_hostname("example.com"), "");
    }

    #[test]
    fn missing_header_is_never_allowed() {
        let origin = RequestOrigin::from_headers(&HeaderMap::new());
        assert_eq!(origin, RequestOrigin::default());
        assert!(!origin.is_allowed(&allowed()));
    }

    #[test]
    fn allow_list_membership() {
        assert!(origin("https://example.com").is_allowed(&allowed()));
        assert!(origin("http://localhost:3000").is_allowed(&allowed()));
        assert!(!origin("https://evil.example.com").is_allowed(&allowed()));
        assert!(!origin("https://example.com").is_allowed(&config(&[])));
    }
}
