#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use talent_documents::{
    config::Config,
    database::{documents::DocumentRepository, profiles::ProfileRepository},
    error::{Error, Result},
    models::{
        document::{DocumentFile, DocumentPatch, NewDocument, Visibility},
        profile::{ProfilePatch, UserProfile, UserRole},
    },
    services::storage_service::LocalStorage,
    utils::signing::UrlSigner,
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";
pub const BASE_URL: &str = "http://files.test";
pub const BOUNDARY: &str = "X-TEST-BOUNDARY";

#[derive(Default)]
pub struct InMemoryDocuments {
    rows: Mutex<Vec<DocumentFile>>,
}

impl InMemoryDocuments {
    pub fn all(&self) -> Vec<DocumentFile> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocuments {
    async fn list_by_user(&self, user_id: Uuid, only_public: bool) -> Result<Vec<DocumentFile>> {
        let mut rows: Vec<DocumentFile> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == user_id && (!only_public || d.visibility.is_public()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<DocumentFile>> {
        Ok(self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_path(&self, file_path: &str) -> Result<Option<DocumentFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.file_path == file_path)
            .cloned())
    }

    async fn insert(&self, document: NewDocument) -> Result<DocumentFile> {
        let row = DocumentFile {
            id: Uuid::new_v4(),
            user_id: document.user_id,
            name: document.name,
            size: document.size,
            content_type: document.content_type,
            visibility: document.visibility,
            file_path: document.file_path,
            created_at: chrono::Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<DocumentFile> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::NotFound("Resource not found".into()))?;
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(visibility) = patch.visibility {
            row.visibility = visibility;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|d| d.id != id);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryProfiles {
    rows: Mutex<Vec<UserProfile>>,
}

#[async_trait]
impl ProfileRepository for InMemoryProfiles {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn create(
        &self,
        id: Uuid,
        role: UserRole,
        name: Option<String>,
    ) -> Result<Option<UserProfile>> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        let profile = UserProfile::new(id, role, name);
        rows.push(profile.clone());
        Ok(Some(profile))
    }

    async fn update(&self, id: Uuid, patch: ProfilePatch) -> Result<Option<UserProfile>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|p| p.id == id).map(|p| {
            p.apply(patch);
            p.clone()
        }))
    }
}

pub struct TestApp {
    pub router: Router,
    pub documents: Arc<InMemoryDocuments>,
    pub profiles: Arc<InMemoryProfiles>,
    pub storage_dir: TempDir,
}

pub fn test_config(storage_root: &std::path::Path, max_upload_bytes: usize) -> Config {
    let root = storage_root.display().to_string();
    let max = max_upload_bytes.to_string();
    Config::from_lookup(move |name| match name {
        "DATABASE_URL" => Some("postgres://unused/test".into()),
        "JWT_SECRET" => Some(JWT_SECRET.into()),
        "STORAGE_ROOT" => Some(root.clone()),
        "PUBLIC_BASE_URL" => Some(BASE_URL.into()),
        "MAX_UPLOAD_BYTES" => Some(max.clone()),
        _ => None,
    })
    .expect("test config")
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_limit(15 * 1024 * 1024)
}

pub fn spawn_app_with_limit(max_upload_bytes: usize) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(storage_dir.path(), max_upload_bytes);
    let documents = Arc::new(InMemoryDocuments::default());
    let profiles = Arc::new(InMemoryProfiles::default());
    let storage = Arc::new(LocalStorage::new(
        &config.storage_root,
        &config.storage_bucket,
        &config.public_base_url,
        UrlSigner::new(&config.url_signing_secret),
    ));

    let state = AppState::from_parts(config, documents.clone(), profiles.clone(), storage);
    TestApp {
        router: talent_documents::routes::router(state),
        documents,
        profiles,
        storage_dir,
    }
}

pub fn token_for(user_id: Uuid) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &json!({ "sub": user_id.to_string(), "exp": exp, "aud": "authenticated" }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("sign token");
    format!("Bearer {}", token)
}

pub fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: JsonValue) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("authorization", token_for(user));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, user: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", token_for(user));
    }
    builder.body(Body::empty()).unwrap()
}

/// Multipart body with one `file` part plus plain text fields.
pub fn upload_request(
    user: Uuid,
    filename: &str,
    content: &[u8],
    fields: &[(&str, &str)],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload-document")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", token_for(user))
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 32 * 1024 * 1024).await.unwrap();
    (status, bytes.to_vec())
}

pub async fn send_json(app: &TestApp, req: Request<Body>) -> (StatusCode, JsonValue) {
    let (status, bytes) = send(app, req).await;
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "expected JSON body, got: {}",
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, body)
}

pub fn seed_document(app: &TestApp, owner: Uuid, visibility: Visibility) -> DocumentFile {
    let row = DocumentFile {
        id: Uuid::new_v4(),
        user_id: owner,
        name: "portfolio.pdf".into(),
        size: "1 KB".into(),
        content_type: Some("application/pdf".into()),
        visibility,
        file_path: format!("{}/1700000000000_portfolio.pdf", owner),
        created_at: chrono::Utc::now(),
    };
    app.documents.rows.lock().unwrap().push(row.clone());
    row
}
