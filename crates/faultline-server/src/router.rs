//! Router assembly for the faultline HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive (CI
/// systems and dashboards call from various origins). TraceLayer
/// provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/events/commit", post(handlers::ingest_commit))
        .route("/events/build", post(handlers::ingest_build))
        .route("/diagnosis/{event_id}", get(handlers::get_diagnosis))
        .route("/feedback", post(handlers::post_feedback))
        .route(
            "/config",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route("/graph/version", get(handlers::graph_version))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
