use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::origin::RequestOrigin;
use super::rejection::Rejection;
use crate::metrics::MetricsRecorder;
use crate::models::LookupResponse;
use crate::state::AppState;
use crate::upstream::{onepass, turnstile};

/// Runs one lookup and composes the uniform response, recording its outcome.
///
/// `token` is `None` when the request body could not be read.
pub async fn handle_lookup(
    state: &AppState,
    origin: &RequestOrigin,
    token: Option<&str>,
    remote_ip: Option<&str>,
) -> LookupResponse {
    let started = Instant::now();
    let result = lookup_member(state, origin, token, remote_ip).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(rejection) => rejection.outcome(),
    };
    state
        .metrics
        .record_lookup(outcome, started.elapsed().as_secs_f64());

    match &result {
        Ok(_) => info!(
            event_name = "gateway.lookup.succeeded",
            event_domain = "gateway",
            "Member lookup succeeded"
        ),
        Err(_) => info!(
            event_name = "gateway.lookup.rejected",
            event_domain = "gateway",
            reason = outcome,
            origin = origin.hostname.as_str(),
            "Member lookup rejected"
        ),
    }

    LookupResponse::from(result)
}

/// Origin check, challenge verification, credential exchange, member lookup.
///
/// Each stage short-circuits with a `Rejection`. A missing token fails the
/// challenge without calling the verifier. The member lookup has no
/// rejection of its own: a failed or unparsable lookup becomes an empty
/// object and is still returned as the member record.
pub async fn lookup_member(
    state: &AppState,
    origin: &RequestOrigin,
    token: Option<&str>,
    remote_ip: Option<&str>,
) -> Result<Value, Rejection> {
    let config = &state.config;

    if !origin.is_allowed(config) {
        return Err(Rejection::Misconfigured);
    }
    let credentials = config.credentials().ok_or(Rejection::Misconfigured)?;
    let token = token.ok_or(Rejection::ChallengeFailed)?;

    // Challenge
    let started = Instant::now();
    let verdict = match turnstile::verify_challenge(
        &state.http,
        &config.upstream.turnstile_verify_url,
        credentials.turnstile_secret,
        token,
        remote_ip,
    )
    .await
    {
        Ok(verdict) => {
            record(state, "turnstile", "ok", started);
            verdict
        }
        Err(e) => {
            record(state, "turnstile", "error", started);
            warn!(
                event_name = "upstream.turnstile.verify.failed",
                event_domain = "upstream",
                error = e.as_str(),
                "challenge verification unavailable, treating verdict as failed"
            );
            Default::default()
        }
    };

    if !verdict.error_codes.is_empty() {
        info!(
            event_name = "upstream.turnstile.verify.error_codes",
            event_domain = "upstream",
            error_codes = ?verdict.error_codes,
            "challenge provider reported error codes"
        );
    }
    let member_code = verdict
        .member_code(config)
        .ok_or(Rejection::ChallengeFailed)?;

    // Credentials
    let base_url = config.onepass_base_url();
    let started = Instant::now();
    let exchanged = onepass::exchange_credentials(
        &state.http,
        base_url,
        &config.upstream.onepass_scope,
        credentials.onepass_id,
        credentials.onepass_secret,
    )
    .await;
    record(
        state,
        "onepass_token",
        if exchanged.is_ok() { "ok" } else { "error" },
        started,
    );
    let access_token = exchanged?;

    // Member
    let started = Instant::now();
    let fetched = match onepass::member_url(base_url, &config.upstream.member_lookup_path, member_code)
    {
        Ok(url) => {
            onepass::fetch_member(&state.http, url, &access_token, &config.upstream.upstream_env)
                .await
        }
        Err(e) => Err(e),
    };

    // TODO: surface lookup failures to the caller instead of an empty
    // success once the frontend handles a lookup error.
    let member = match fetched {
        Ok(member) => {
            record(state, "onepass_member", "ok", started);
            member
        }
        Err(e) => {
            record(state, "onepass_member", "swallowed", started);
            warn!(
                event_name = "upstream.onepass.member.failed",
                event_domain = "upstream",
                error = e.as_str(),
                "member lookup failed, returning an empty record"
            );
            Value::Object(Map::new())
        }
    };

    Ok(member)
}

fn record(state: &AppState, upstream: &str, result: &str, started: Instant) {
    state
        .metrics
        .record_upstream_call(upstream, result, started.elapsed().as_secs_f64());
}
