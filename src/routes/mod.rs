pub mod health;
pub mod metrics;
pub mod public;
pub mod verify;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Build the API router. `/metrics` is added by the binary, which owns the
/// Prometheus recorder.
pub fn router(state: AppState, body_limit: usize, request_timeout: Duration) -> Router {
    let public_api = Router::new()
        .route("/api/v1/verify", post(public::verify_public))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            public::require_api_key,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/verify", post(verify::verify_document))
        .merge(public_api)
        .with_state(state)
        // Size is enforced by RequestBodyLimitLayer and the upload constraints.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
