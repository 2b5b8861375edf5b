use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    utils::files::{guess_content_type, is_safe_key},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignedQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// Serves objects of the local storage backend. A valid signature grants
/// access to any object; otherwise only objects of public documents are
/// served.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<SignedQuery>,
) -> Result<Response> {
    let not_found = || Error::NotFound("File not found".into());
    if !is_safe_key(&key) {
        return Err(not_found());
    }

    let signed = match (query.expires, query.signature.as_deref()) {
        (Some(expires), Some(signature)) => {
            state
                .signer
                .verify(&key, expires, signature, chrono::Utc::now())
        }
        _ => false,
    };

    if !signed && !state.document_service.is_public_object(&key).await? {
        tracing::debug!(key = %key, "refused unsigned access to non-public object");
        return Err(not_found());
    }

    let data = state
        .document_service
        .fetch_object(&key)
        .await?
        .ok_or_else(not_found)?;

    let cache = if signed {
        "private, no-store"
    } else {
        "public, max-age=300"
    };

    let mut resp = data.into_response();
    let headers = resp.headers_mut();
    let content_type = HeaderValue::from_str(&guess_content_type(&key))
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    Ok(resp)
}
