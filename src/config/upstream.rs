use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";
pub const ONEPASS_PRODUCTION_URL: &str = "https://api.uhg.com";
pub const ONEPASS_STAGING_URL: &str = "https://api-stg.uhg.com";
pub const ONEPASS_SCOPE: &str = "https://api.uhg.com/.default";
pub const MEMBER_LOOKUP_PATH: &str =
    "/api/cloud/api-management/pass-edge/1.0.0/rest/pass-edge/v2/members/code/";

/// Endpoints and transport settings for the outbound calls.
///
/// Every field defaults to the production value, so deployments normally
/// leave this block out entirely. Tests point the URLs at local mock servers.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_turnstile_verify_url")]
    pub turnstile_verify_url: String,
    #[serde(default = "default_onepass_production_url")]
    pub onepass_production_url: String,
    #[serde(default = "default_onepass_staging_url")]
    pub onepass_staging_url: String,
    #[serde(default = "default_onepass_scope")]
    pub onepass_scope: String,
    #[serde(default = "default_member_lookup_path")]
    pub member_lookup_path: String,
    /// Value sent in the `X-Upstream-Env` header of the member lookup.
    #[serde(default = "default_upstream_env")]
    pub upstream_env: String,
    /// Per-call timeout applied to every outbound request.
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            turnstile_verify_url: default_turnstile_verify_url(),
            onepass_production_url: default_onepass_production_url(),
            onepass_staging_url: default_onepass_staging_url(),
            onepass_scope: default_onepass_scope(),
            member_lookup_path: default_member_lookup_path(),
            upstream_env: default_upstream_env(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

fn default_turnstile_verify_url() -> String {
    TURNSTILE_VERIFY_URL.to_string()
}

fn default_onepass_production_url() -> String {
    ONEPASS_PRODUCTION_URL.to_string()
}

fn default_onepass_staging_url() -> String {
    ONEPASS_STAGING_URL.to_string()
}

fn default_onepass_scope() -> String {
    ONEPASS_SCOPE.to_string()
}

fn default_member_lookup_path() -> String {
    MEMBER_LOOKUP_PATH.to_string()
}

fn default_upstream_env() -> String {
    "integration".to_string()
}

fn default_timeout_in_ms() -> u64 {
    10_000
}
