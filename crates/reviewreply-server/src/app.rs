//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Build the Axum application
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let cors = if server.cors_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };
    let body_limit = server.body_limit_bytes;

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/analyse", post(routes::analyse))
        .route("/analyze", post(routes::analyse))
        .route("/stats", get(routes::stats))
        .route("/debug/text", post(routes::debug_text))
        .route("/metrics", get(routes::metrics))
        .fallback(routes::fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
