use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Secret;
use crate::models::OnepassToken;

/// Why a client-credentials exchange did not produce a bearer token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    /// The body could not be parsed as JSON. Carries the raw body (or the
    /// transport error when there was no body) for diagnosis.
    #[error("Onepass endpoint returned a non-JSON result: {0}")]
    NonJson(String),
    /// The body was JSON but held no `access_token`.
    #[error("Unauthorized to access Onepass.")]
    MissingToken,
}

/// Exchanges the service credentials for a short-lived bearer token at
/// `<base_url>/oauth2/token`.
///
/// The body is read as text first so that a non-JSON answer can be told
/// apart from a JSON answer without a token.
pub async fn exchange_credentials(
    client: &Client,
    base_url: &str,
    scope: &str,
    client_id: &Secret,
    client_secret: &Secret,
) -> Result<String, ExchangeError> {
    let token_endpoint = format!("{}/oauth2/token", base_url);
    debug!("Exchanging client credentials at '{}'", token_endpoint);

    let form = [
        ("client_id", client_id.expose()),
        ("client_secret", client_secret.expose()),
        ("grant_type", "client_credentials"),
        ("scope", scope),
    ];

    let body = client
        .post(&token_endpoint)
        .form(&form)
        .send()
        .await
        .map_err(|e| ExchangeError::NonJson(e.to_string()))?
        .text()
        .await
        .map_err(|e| ExchangeError::NonJson(e.to_string()))?;

    let json = serde_json::from_str::<Value>(&body).map_err(|_| ExchangeError::NonJson(body))?;

    // `null`, arrays and scalars are valid JSON but carry no token either.
    let token = serde_json::from_value::<OnepassToken>(json).unwrap_or_default();
    let access_token = token.access_token.ok_or(ExchangeError::MissingToken)?;

    debug!("Client credentials exchange completed successfully");
    Ok(access_token)
}

/// Builds `<base_url><lookup_path><member_code>`, percent-encoding the code
/// as a single path segment.
pub fn member_url(base_url: &str, lookup_path: &str, member_code: &str) -> Result<Url, String> {
    let mut url = Url::parse(&format!("{}{}", base_url, lookup_path))
        .map_err(|e| format!("Invalid member lookup URL: {}", e))?;
    url.path_segments_mut()
        .map_err(|_| "Member lookup URL cannot carry a path".to_string())?
        .pop_if_empty()
        .push(member_code);
    Ok(url)
}

/// Fetches the member record for `member_code`, returning whatever JSON the
/// lookup API answers with.
pub async fn fetch_member(
    client: &Client,
    url: Url,
    access_token: &str,
    upstream_env: &str,
) -> Result<Value, String> {
    debug!(
        "Fetching member record from '{}'",
        url.host_str().unwrap_or_default()
    );

    let member = client
        .get(url)
        .header("Content-Type", "application/json")
        .header("X-Upstream-Env", upstream_env)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| format!("Failed to call member lookup endpoint: {}", e))?
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse member lookup JSON: {}", e))?;

    debug!("Member lookup completed");
    Ok(member)
}
