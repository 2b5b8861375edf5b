use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::document::{DocumentFile, DocumentPatch, Visibility};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub size: String,
    pub content_type: Option<String>,
    pub visibility: Visibility,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    /// Only present for public documents.
    pub public_url: Option<String>,
}

impl DocumentResponse {
    pub fn new(document: DocumentFile, public_url: Option<String>) -> Self {
        Self {
            id: document.id,
            user_id: document.user_id,
            name: document.name,
            size: document.size,
            content_type: document.content_type,
            visibility: document.visibility,
            file_path: document.file_path,
            created_at: document.created_at,
            public_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentEnvelope {
    pub document: DocumentResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentUrlResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct ListDocumentsQuery {
    /// Whose documents to list; another user's list is limited to public ones.
    pub user_id: Option<Uuid>,
}

/// Only `name` and `visibility` are writable; any other key in the body is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentPayload {
    #[serde(alias = "documentId", alias = "document_id")]
    pub id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub visibility: Option<Visibility>,
}

impl UpdateDocumentPayload {
    pub fn into_patch(self) -> (Uuid, DocumentPatch) {
        (
            self.id,
            DocumentPatch {
                name: self.name.map(|n| n.trim().to_string()),
                visibility: self.visibility,
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentIdPayload {
    #[serde(alias = "documentId", alias = "document_id")]
    pub id: Uuid,
}

/// Multipart form accepted by the upload endpoint (schema only).
#[derive(ToSchema)]
pub struct UploadDocumentForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub visibility: Option<Visibility>,
    pub name: Option<String>,
}
