pub mod docs;
pub mod documents;
pub mod files;
pub mod health;
pub mod profiles;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use crate::middleware::{auth::require_bearer_auth, json_errors::json_error_envelope};
use crate::AppState;

/// Headroom for multipart boundaries and the non-file form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Every route of the service. Transport layers (CORS, request tracing) are
/// added by the binary.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let document_api = Router::new()
        .route("/api/list-documents", get(documents::list_documents))
        .route("/api/update-document", post(documents::update_document))
        .route("/api/delete-document", post(documents::delete_document))
        .route("/api/get-document-url", post(documents::get_document_url))
        .route(
            "/api/profile",
            get(profiles::get_profile)
                .post(profiles::create_profile)
                .patch(profiles::update_profile),
        )
        .layer(TimeoutLayer::new(config.request_timeout));

    let upload_api = Router::new()
        .route("/api/upload-document", post(documents::upload_document))
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(TimeoutLayer::new(config.upload_timeout));

    let authenticated = document_api
        .merge(upload_api)
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let public_api = Router::new()
        .route(
            "/api/public/profiles/:id",
            get(profiles::get_public_profile),
        )
        .route("/files/*key", get(files::serve_file))
        .layer(TimeoutLayer::new(config.request_timeout));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi_json))
        .merge(authenticated)
        .merge(public_api)
        .with_state(state)
        .layer(from_fn(json_error_envelope))
}
