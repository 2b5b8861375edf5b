pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, StorageBackend};
use crate::database::{
    documents::{DocumentRepository, PgDocumentRepository},
    profiles::{PgProfileRepository, ProfileRepository},
};
use crate::error::{Error, Result};
use crate::services::{
    document_service::DocumentService,
    profile_service::ProfileService,
    storage_service::{LocalStorage, ObjectStorage},
    supabase_storage::SupabaseStorage,
};
use crate::utils::signing::UrlSigner;
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signer: UrlSigner,
    pub document_service: DocumentService,
    pub profile_service: ProfileService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let storage = build_storage(&config)?;
        Ok(Self::from_parts(
            config,
            Arc::new(PgDocumentRepository::new(pool.clone())),
            Arc::new(PgProfileRepository::new(pool)),
            storage,
        ))
    }

    /// Wires services over explicit repositories and storage.
    pub fn from_parts(
        config: Config,
        documents: Arc<dyn DocumentRepository>,
        profiles: Arc<dyn ProfileRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let signer = UrlSigner::new(&config.url_signing_secret);
        let document_service = DocumentService::new(
            documents,
            storage,
            config.max_upload_bytes,
            config.signed_url_ttl,
        );
        let profile_service = ProfileService::new(profiles);

        Self {
            config: Arc::new(config),
            signer,
            document_service,
            profile_service,
        }
    }
}

pub fn build_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    match config.storage_backend {
        StorageBackend::Local => {
            tracing::info!(root = %config.storage_root.display(), bucket = %config.storage_bucket, "using local object storage");
            Ok(Arc::new(LocalStorage::new(
                &config.storage_root,
                &config.storage_bucket,
                &config.public_base_url,
                UrlSigner::new(&config.url_signing_secret),
            )))
        }
        StorageBackend::Supabase => {
            let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_service_key) else {
                return Err(Error::Config(
                    "Supabase storage requires SUPABASE_URL and SUPABASE_SERVICE_KEY".into(),
                ));
            };
            let http_client = Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?;
            tracing::info!(url = %url, bucket = %config.storage_bucket, "using supabase object storage");
            Ok(Arc::new(SupabaseStorage::new(
                http_client,
                url,
                &config.storage_bucket,
                key,
            )?))
        }
    }
}
