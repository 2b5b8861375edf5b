use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::{Error, Result};
use crate::services::storage_service::ObjectStorage;
use crate::utils::files::is_safe_key;

/// Supabase Storage REST client authenticated with the service-role key.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: Url,
    bucket: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(client: Client, project_url: &str, bucket: &str, service_key: &str) -> Result<Self> {
        let base_url = Url::parse(project_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid SUPABASE_URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "SUPABASE_URL cannot be used as a base URL: {}",
                project_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn endpoint(&self, prefix: &[&str], key: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(["storage", "v1"]);
            segments.extend(prefix.iter().copied());
            segments.push(&self.bucket);
            if let Some(key) = key {
                segments.extend(key.split('/'));
            }
        }
        url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    fn check_key(key: &str) -> Result<()> {
        if is_safe_key(key) {
            Ok(())
        } else {
            Err(Error::BadRequest(format!("Invalid storage key: {}", key)))
        }
    }

    async fn failure(action: &str, key: &str, resp: reqwest::Response) -> Error {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::error!(action, key, %status, body = %body, "supabase storage request failed");
        Error::Storage(format!("{} {} failed with {}", action, key, status))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        Self::check_key(key)?;
        let url = self.endpoint(&["object"], Some(key));
        let resp = self
            .authorized(self.client.post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::failure("upload", key, resp).await);
        }
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Option<Bytes>> {
        Self::check_key(key)?;
        let url = self.endpoint(&["object", "authenticated"], Some(key));
        let resp = self.authorized(self.client.get(url)).send().await?;
        match resp.status() {
            s if s.is_success() => Ok(Some(resp.bytes().await?)),
            // Storage answers 400 for missing objects in some versions.
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(None),
            _ => Err(Self::failure("download", key, resp).await),
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Self::check_key(key)?;
        let url = self.endpoint(&["object"], None);
        let resp = self
            .authorized(self.client.delete(url))
            .json(&json!({ "prefixes": [key] }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::failure("remove", key, resp).await);
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.endpoint(&["object", "public"], Some(key)).to_string()
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String> {
        Self::check_key(key)?;
        let url = self.endpoint(&["object", "sign"], Some(key));
        let resp = self
            .authorized(self.client.post(url))
            .json(&json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::failure("sign", key, resp).await);
        }
        let body: SignedUrlResponse = resp.json().await?;
        // signedURL is relative to the storage API root.
        let storage_root = format!("{}/storage/v1", self.base_url.as_str().trim_end_matches('/'));
        let relative = body.signed_url.trim_start_matches('/');
        Ok(format!("{}/{}", storage_root, relative))
    }
}
