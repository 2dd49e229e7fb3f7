//! Observability HTTP Routes
//!
//! Health check and a JSON snapshot of the server counters.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::observability::{Event, Logger, MetricsSnapshot};

use super::messages::HealthResponse;
use super::server::AppState;

/// Create health and metrics routes
pub fn observability_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    Logger::trace(Event::HealthCheck.as_str(), &[]);
    let response = HealthResponse {
        status: "SERVING".to_string(),
        description: "DAS server is healthy.".to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
