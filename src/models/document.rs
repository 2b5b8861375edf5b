use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "document_visibility", rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!("visibility must be 'public' or 'private', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentFile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Human readable, e.g. `"1.5 MB"`.
    pub size: String,
    pub content_type: Option<String>,
    pub visibility: Visibility,
    /// Object storage key.
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentFile {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Values for a row that is about to be inserted.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub name: String,
    pub size: String,
    pub content_type: Option<String>,
    pub visibility: Visibility,
    pub file_path: String,
}

/// Allow-listed mutable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub visibility: Option<Visibility>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.visibility.is_none()
    }
}
