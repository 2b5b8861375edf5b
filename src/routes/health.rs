use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{config::StorageBackend, AppState};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up, with the active storage backend"))
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let storage = match state.config.storage_backend {
        StorageBackend::Local => "local",
        StorageBackend::Supabase => "supabase",
    };
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "storage": storage,
            "max_upload_bytes": state.config.max_upload_bytes,
        })),
    )
}
