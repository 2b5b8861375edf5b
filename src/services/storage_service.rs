use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::error::{Error, Result};
use crate::utils::files::is_safe_key;
use crate::utils::signing::UrlSigner;

/// Object storage holding uploaded document bytes, addressed by key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// `None` when no object exists under `key`.
    async fn download(&self, key: &str) -> Result<Option<Bytes>>;

    async fn remove(&self, key: &str) -> Result<()>;

    fn public_url(&self, key: &str) -> String;

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String>;
}

/// Filesystem-backed store. Objects live under `<root>/<bucket>/<key>` and
/// are served back through `GET /files/{key}`.
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
    signer: UrlSigner,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>, bucket: &str, base_url: &str, signer: UrlSigner) -> Self {
        Self {
            root: root.as_ref().join(bucket),
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_safe_key(key) {
            return Err(Error::BadRequest(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(&self, key: &str, data: Bytes, _content_type: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &data).await.map_err(|e| {
            tracing::error!(key, error = %e, "failed to write object");
            Error::Storage(format!("Failed to save file: {}", e))
        })?;
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Option<Bytes>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!("Failed to remove {}: {}", key, e))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/files/{}", self.base_url, key)
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String> {
        self.path_for(key)?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| Error::Internal(format!("Invalid signed URL ttl: {}", e)))?;
        let expires = (chrono::Utc::now() + ttl).timestamp();
        let signature = self.signer.sign(key, expires);
        Ok(format!(
            "{}?expires={}&signature={}",
            self.public_url(key),
            expires,
            signature
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "documents", "http://localhost:8080/", UrlSigner::new("secret"))
    }

    #[tokio::test]
    async fn upload_download_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());

        store
            .upload("user-1/1_cv.pdf", Bytes::from_static(b"%PDF-1.4"), "application/pdf")
            .await
            .unwrap();
        assert!(dir.path().join("documents/user-1/1_cv.pdf").exists());

        let data = store.download("user-1/1_cv.pdf").await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"%PDF-1.4"[..]));

        store.remove("user-1/1_cv.pdf").await.unwrap();
        assert!(store.download("user-1/1_cv.pdf").await.unwrap().is_none());
        // Removing twice is not an error.
        store.remove("user-1/1_cv.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());
        let err = store
            .upload("../outside.txt", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn signed_url_verifies_with_same_secret() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(dir.path());

        assert_eq!(
            store.public_url("u/1_a.pdf"),
            "http://localhost:8080/files/u/1_a.pdf"
        );

        let url = store
            .signed_url("u/1_a.pdf", Duration::from_secs(600))
            .await
            .unwrap();
        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(parsed.path(), "/files/u/1_a.pdf");

        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        let expires: i64 = params["expires"].parse().unwrap();
        let now = chrono::Utc::now();
        assert!(expires > now.timestamp() + 590 && expires <= now.timestamp() + 600);
        assert!(UrlSigner::new("secret").verify("u/1_a.pdf", expires, &params["signature"], now));
    }
}
