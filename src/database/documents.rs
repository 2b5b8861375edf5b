use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::document::{DocumentFile, DocumentPatch, NewDocument};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Newest first. `only_public` drops private rows.
    async fn list_by_user(&self, user_id: Uuid, only_public: bool) -> Result<Vec<DocumentFile>>;

    async fn find(&self, id: Uuid) -> Result<Option<DocumentFile>>;

    async fn find_by_path(&self, file_path: &str) -> Result<Option<DocumentFile>>;

    async fn insert(&self, document: NewDocument) -> Result<DocumentFile>;

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<DocumentFile>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

const DOCUMENT_COLUMNS: &str =
    "id, user_id, name, size, content_type, visibility, file_path, created_at";

#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list_by_user(&self, user_id: Uuid, only_public: bool) -> Result<Vec<DocumentFile>> {
        let query = format!(
            "SELECT {} FROM documents
             WHERE user_id = $1 AND ($2 = FALSE OR visibility = 'public')
             ORDER BY created_at DESC",
            DOCUMENT_COLUMNS
        );
        let items = sqlx::query_as::<_, DocumentFile>(&query)
            .bind(user_id)
            .bind(only_public)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find(&self, id: Uuid) -> Result<Option<DocumentFile>> {
        let query = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);
        let document = sqlx::query_as::<_, DocumentFile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn find_by_path(&self, file_path: &str) -> Result<Option<DocumentFile>> {
        let query = format!(
            "SELECT {} FROM documents WHERE file_path = $1",
            DOCUMENT_COLUMNS
        );
        let document = sqlx::query_as::<_, DocumentFile>(&query)
            .bind(file_path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn insert(&self, document: NewDocument) -> Result<DocumentFile> {
        let query = format!(
            "INSERT INTO documents (user_id, name, size, content_type, visibility, file_path)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, DocumentFile>(&query)
            .bind(document.user_id)
            .bind(document.name)
            .bind(document.size)
            .bind(document.content_type)
            .bind(document.visibility)
            .bind(document.file_path)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<DocumentFile> {
        let query = format!(
            "UPDATE documents
             SET name = COALESCE($2, name),
                 visibility = COALESCE($3, visibility)
             WHERE id = $1
             RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, DocumentFile>(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.visibility)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
