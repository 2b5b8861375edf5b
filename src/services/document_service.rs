use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use uuid::Uuid;

use crate::database::documents::DocumentRepository;
use crate::dto::document_dto::DocumentResponse;
use crate::error::{Error, Result};
use crate::models::document::{DocumentFile, DocumentPatch, NewDocument, Visibility};
use crate::services::storage_service::ObjectStorage;
use crate::utils::files::{format_file_size, guess_content_type, storage_key};

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub display_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub visibility: Visibility,
}

const MAX_DOCUMENT_NAME_CHARS: usize = 255;

/// Trimmed display name, 1 to 255 characters.
fn document_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::BadRequest("Document name must not be empty".into()));
    }
    if name.chars().count() > MAX_DOCUMENT_NAME_CHARS {
        return Err(Error::BadRequest(format!(
            "Document name must be at most {} characters",
            MAX_DOCUMENT_NAME_CHARS
        )));
    }
    Ok(name.to_string())
}

#[derive(Clone)]
pub struct DocumentService {
    repo: Arc<dyn DocumentRepository>,
    storage: Arc<dyn ObjectStorage>,
    max_upload_bytes: usize,
    signed_url_ttl: Duration,
}

impl DocumentService {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        storage: Arc<dyn ObjectStorage>,
        max_upload_bytes: usize,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            storage,
            max_upload_bytes,
            signed_url_ttl,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    fn to_response(&self, document: DocumentFile) -> DocumentResponse {
        let public_url = document
            .visibility
            .is_public()
            .then(|| self.storage.public_url(&document.file_path));
        DocumentResponse::new(document, public_url)
    }

    /// Documents of `owner` (the caller when `None`). Another user's list only
    /// contains their public documents.
    pub async fn list(&self, caller: Uuid, owner: Option<Uuid>) -> Result<Vec<DocumentResponse>> {
        let owner = owner.unwrap_or(caller);
        let only_public = owner != caller;
        let rows = self.repo.list_by_user(owner, only_public).await?;
        Ok(rows.into_iter().map(|d| self.to_response(d)).collect())
    }

    pub async fn public_documents(&self, owner: Uuid) -> Result<Vec<DocumentResponse>> {
        let rows = self.repo.list_by_user(owner, true).await?;
        Ok(rows.into_iter().map(|d| self.to_response(d)).collect())
    }

    pub async fn upload(&self, caller: Uuid, upload: DocumentUpload) -> Result<DocumentResponse> {
        if upload.data.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".into()));
        }
        if upload.data.len() > self.max_upload_bytes {
            return Err(Error::BadRequest(format!(
                "File exceeds the {} upload limit",
                format_file_size(self.max_upload_bytes as u64)
            )));
        }

        let key = storage_key(caller, &upload.filename, chrono::Utc::now());
        let content_type = upload
            .content_type
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| guess_content_type(&upload.filename));
        let name = upload
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| upload.filename.clone());
        let name = document_name(&name)?;
        let size = format_file_size(upload.data.len() as u64);

        self.storage
            .upload(&key, upload.data, &content_type)
            .await?;

        let inserted = self
            .repo
            .insert(NewDocument {
                user_id: caller,
                name,
                size,
                content_type: Some(content_type),
                visibility: upload.visibility,
                file_path: key.clone(),
            })
            .await;

        match inserted {
            Ok(document) => {
                tracing::info!(user_id = %caller, document_id = %document.id, key = %key, "document uploaded");
                Ok(self.to_response(document))
            }
            Err(e) => {
                tracing::error!(user_id = %caller, key = %key, error = %e, "document insert failed after upload");
                if let Err(cleanup) = self.storage.remove(&key).await {
                    tracing::warn!(key = %key, error = %cleanup, "failed to remove orphaned object");
                }
                Err(e)
            }
        }
    }

    /// Loads the document and checks the caller owns it.
    async fn owned(&self, caller: Uuid, id: Uuid) -> Result<DocumentFile> {
        let document = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Document not found".into()))?;
        if !document.is_owned_by(caller) {
            return Err(Error::Forbidden("You do not own this document".into()));
        }
        Ok(document)
    }

    pub async fn update(&self, caller: Uuid, id: Uuid, patch: DocumentPatch) -> Result<DocumentResponse> {
        if patch.is_empty() {
            return Err(Error::BadRequest("No valid fields to update".into()));
        }
        let patch = DocumentPatch {
            name: patch.name.as_deref().map(document_name).transpose()?,
            ..patch
        };
        self.owned(caller, id).await?;
        let document = self.repo.update(id, patch).await?;
        tracing::info!(user_id = %caller, document_id = %id, "document updated");
        Ok(self.to_response(document))
    }

    /// Storage removal is best-effort so the row is always cleaned up.
    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<()> {
        let document = self.owned(caller, id).await?;

        if let Err(e) = self.storage.remove(&document.file_path).await {
            tracing::warn!(
                document_id = %id,
                key = %document.file_path,
                error = %e,
                "storage delete failed; removing row anyway"
            );
        }

        if !self.repo.delete(id).await? {
            return Err(Error::NotFound("Document not found".into()));
        }
        tracing::info!(user_id = %caller, document_id = %id, "document deleted");
        Ok(())
    }

    /// Public documents resolve to their public URL for anyone; private ones
    /// get a short-lived signed URL, owner only.
    pub async fn document_url(&self, caller: Uuid, id: Uuid) -> Result<String> {
        let document = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Document not found".into()))?;

        if document.visibility.is_public() {
            return Ok(self.storage.public_url(&document.file_path));
        }
        if !document.is_owned_by(caller) {
            return Err(Error::Forbidden("Access denied".into()));
        }
        self.storage
            .signed_url(&document.file_path, self.signed_url_ttl)
            .await
    }

    /// Whether `key` may be served without a signature.
    pub async fn is_public_object(&self, key: &str) -> Result<bool> {
        Ok(self
            .repo
            .find_by_path(key)
            .await?
            .map(|d| d.visibility.is_public())
            .unwrap_or(false))
    }

    pub async fn fetch_object(&self, key: &str) -> Result<Option<Bytes>> {
        self.storage.download(key).await
    }
}
