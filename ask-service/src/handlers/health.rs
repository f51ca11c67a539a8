use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::startup::AppState;

/// Liveness probe. Never touches the upstream.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ask-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the provider must be able to serve requests.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.provider.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Text provider is not ready");
        AppError::ServiceUnavailable
    })?;

    Ok(StatusCode::OK)
}
