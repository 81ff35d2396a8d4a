use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use mealdeck_store::KeyValueStore;
use serde_json::json;

use crate::routes::AppState;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe, checks the store can be read
pub async fn ready(State(app): State<AppState>) -> impl IntoResponse {
    match app.store.get(mealdeck_store::FAVORITES) {
        Ok(_) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            tracing::error!("Readiness check failed: store unavailable - {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "reason": "store_unavailable"
                })),
            )
        }
    }
}
