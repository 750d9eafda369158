//! The member lookup endpoint.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{middleware, routing::post, Json, Router};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::gateway::{handle_lookup, origin_gate, RequestOrigin};
use crate::models::LookupResponse;
use crate::state::AppState;
use crate::utils::http_helpers::ClientIp;

/// Registers `POST /` and its pre-flight, both wrapped by the origin gate.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(lookup).options(preflight))
        .layer(middleware::from_fn_with_state(state, origin_gate))
}

/// Pre-flight always succeeds; the CORS headers come from the origin gate.
async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Redeems the challenge token in the body for a member record.
///
/// The whole body is the token. The answer is always `200` with a
/// `{success, error?, data?}` body, including when the body cannot be read
/// (for instance when it exceeds the body limit).
async fn lookup(
    State(state): State<AppState>,
    origin: RequestOrigin,
    ClientIp(client_ip): ClientIp,
    body: Result<Bytes, BytesRejection>,
) -> Json<LookupResponse> {
    let span = info_span!("lookup", request_id = %Uuid::new_v4());

    let body = match body {
        Ok(bytes) => Some(bytes),
        Err(rejection) => {
            span.in_scope(|| {
                warn!(
                    event_name = "gateway.lookup.body_unreadable",
                    event_domain = "gateway",
                    status = rejection.status().as_u16(),
                    error = %rejection.body_text(),
                    "request body could not be read"
                )
            });
            None
        }
    };
    let token = body.as_deref().map(String::from_utf8_lossy);

    let response = handle_lookup(&state, &origin, token.as_deref(), client_ip.as_deref())
        .instrument(span)
        .await;
    Json(response)
}
