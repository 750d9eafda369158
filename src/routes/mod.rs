//! HTTP route definitions and handlers.
//!
//! The lookup endpoint lives at `/` behind the origin gate. Health and
//! metrics endpoints sit outside it.

mod health_routes;
mod lookup_routes;
mod metrics;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(lookup_routes::routes(state.clone()))
        .merge(health_routes::routes())
        .merge(metrics::routes())
        .with_state(state)
}
