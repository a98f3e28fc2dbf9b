use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::storage::ContentPersister;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(persister): State<Arc<ContentPersister>>) -> impl IntoResponse {
    match persister.probe().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "storage": "connected",
                "backend": persister.backend_name()
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend = persister.backend_name(), "Storage readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "storage": "unreachable",
                    "backend": persister.backend_name()
                })),
            )
        }
    }
}
