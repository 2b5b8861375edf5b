use axum::Json;
use utoipa::OpenApi;

use crate::dto::document_dto::{
    DocumentEnvelope, DocumentIdPayload, DocumentListResponse, DocumentResponse,
    DocumentUrlResponse, SuccessResponse, UpdateDocumentPayload, UploadDocumentForm,
};
use crate::dto::profile_dto::{
    CreateProfilePayload, ProfileResponse, PublicProfileResponse, UpdateProfilePayload,
};
use crate::models::document::Visibility;
use crate::models::profile::UserRole;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::documents::list_documents,
        crate::routes::documents::upload_document,
        crate::routes::documents::update_document,
        crate::routes::documents::delete_document,
        crate::routes::documents::get_document_url,
        crate::routes::profiles::create_profile,
        crate::routes::profiles::get_profile,
        crate::routes::profiles::update_profile,
        crate::routes::profiles::get_public_profile,
    ),
    components(schemas(
        Visibility,
        UserRole,
        DocumentResponse,
        DocumentListResponse,
        DocumentEnvelope,
        DocumentUrlResponse,
        SuccessResponse,
        UpdateDocumentPayload,
        DocumentIdPayload,
        UploadDocumentForm,
        CreateProfilePayload,
        UpdateProfilePayload,
        ProfileResponse,
        PublicProfileResponse,
    )),
    tags(
        (name = "documents", description = "Document upload and sharing"),
        (name = "profiles", description = "Candidate and recruiter profiles"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
