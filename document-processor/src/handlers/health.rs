use crate::config::SERVICE_NAME;
use crate::dtos::{HealthResponse, ReadinessResponse};
use crate::lifecycle::ServerState;
use crate::services::render_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ready only while the server is accepting new requests.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let current = *state.lifecycle.borrow();
    let status = match current {
        ServerState::Listening => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };

    let label = match current {
        ServerState::Listening => "ready",
        other => other.as_str(),
    };

    (
        status,
        Json(ReadinessResponse {
            status: label.to_string(),
        }),
    )
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        render_metrics(state.metrics.as_ref(), state.documents_processed.as_ref()),
    )
}
