use crate::services::metrics::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Never touches the model.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.dispatcher.model();
    Json(json!({
        "status": "ok",
        "service": "product-ai-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": model.name(),
        "model": model.model()
    }))
}

/// Readiness probe: the model backend must answer.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.dispatcher.model().health_check().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": e.kind() })),
            )
        }
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        get_metrics(),
    )
}
