use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bytes::Bytes;

use crate::{
    dto::document_dto::{
        DocumentEnvelope, DocumentIdPayload, DocumentListResponse, DocumentUrlResponse,
        ListDocumentsQuery, SuccessResponse, UpdateDocumentPayload, UploadDocumentForm,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::document::Visibility,
    services::document_service::DocumentUpload,
    utils::validation::validate,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/list-documents",
    tag = "documents",
    params(ListDocumentsQuery),
    responses(
        (status = 200, description = "Documents, newest first", body = DocumentListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<impl IntoResponse> {
    let documents = state
        .document_service
        .list(user.user_id, query.user_id)
        .await?;
    Ok(Json(DocumentListResponse { documents }))
}

#[utoipa::path(
    post,
    path = "/api/upload-document",
    tag = "documents",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = DocumentEnvelope),
        (status = 400, description = "Missing, empty or oversized file"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut visibility = Visibility::default();
    let mut display_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    tracing::warn!(user_id = %user.user_id, error = %e, "failed to read upload");
                    Error::BadRequest(format!(
                        "Failed to read file upload (limit is {} bytes)",
                        state.document_service.max_upload_bytes()
                    ))
                })?;
                file = Some((filename, content_type, data));
            }
            "visibility" => {
                let raw = field.text().await?;
                visibility = raw.parse().map_err(Error::BadRequest)?;
            }
            "name" => display_name = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| Error::BadRequest("No file provided".into()))?;

    let document = state
        .document_service
        .upload(
            user.user_id,
            DocumentUpload {
                filename,
                display_name,
                content_type,
                data,
                visibility,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DocumentEnvelope { document })))
}

#[utoipa::path(
    post,
    path = "/api/update-document",
    tag = "documents",
    request_body = UpdateDocumentPayload,
    responses(
        (status = 200, description = "Document updated", body = DocumentEnvelope),
        (status = 400, description = "No updatable field supplied"),
        (status = 403, description = "Caller does not own the document"),
        (status = 404, description = "Document not found")
    )
)]
#[axum::debug_handler]
pub async fn update_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateDocumentPayload>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let (id, patch) = payload.into_patch();
    let document = state.document_service.update(user.user_id, id, patch).await?;
    Ok(Json(DocumentEnvelope { document }))
}

#[utoipa::path(
    post,
    path = "/api/delete-document",
    tag = "documents",
    request_body = DocumentIdPayload,
    responses(
        (status = 200, description = "Document deleted", body = SuccessResponse),
        (status = 403, description = "Caller does not own the document"),
        (status = 404, description = "Document not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DocumentIdPayload>,
) -> Result<impl IntoResponse> {
    state.document_service.delete(user.user_id, payload.id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    post,
    path = "/api/get-document-url",
    tag = "documents",
    request_body = DocumentIdPayload,
    responses(
        (status = 200, description = "Public URL or a signed URL valid for a limited time", body = DocumentUrlResponse),
        (status = 403, description = "Private document owned by someone else"),
        (status = 404, description = "Document not found")
    )
)]
#[axum::debug_handler]
pub async fn get_document_url(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DocumentIdPayload>,
) -> Result<impl IntoResponse> {
    let url = state
        .document_service
        .document_url(user.user_id, payload.id)
        .await?;
    Ok(Json(DocumentUrlResponse { url }))
}
