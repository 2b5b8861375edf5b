use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Supabase,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "supabase" => Ok(StorageBackend::Supabase),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    pub storage_root: PathBuf,
    pub public_base_url: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub url_signing_secret: String,
    pub signed_url_ttl: Duration,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub log_json: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let jwt_secret = vars.require("JWT_SECRET")?;
        let storage_backend: StorageBackend = vars.parse_or("STORAGE_BACKEND", StorageBackend::Local)?;
        let supabase_url = vars.optional("SUPABASE_URL");
        let supabase_service_key = vars.optional("SUPABASE_SERVICE_KEY");

        if storage_backend == StorageBackend::Supabase
            && (supabase_url.is_none() || supabase_service_key.is_none())
        {
            return Err(Error::Config(
                "SUPABASE_URL and SUPABASE_SERVICE_KEY are required for the supabase storage backend"
                    .to_string(),
            ));
        }

        Ok(Self {
            server_address: vars.optional("SERVER_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            database_url: vars.require("DATABASE_URL")?,
            jwt_audience: vars.optional("JWT_AUDIENCE"),
            storage_backend,
            storage_bucket: vars.optional("STORAGE_BUCKET").unwrap_or_else(|| "documents".to_string()),
            storage_root: PathBuf::from(vars.optional("STORAGE_ROOT").unwrap_or_else(|| "./storage".to_string())),
            public_base_url: vars
                .optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            supabase_url: supabase_url.map(|u| u.trim_end_matches('/').to_string()),
            supabase_service_key,
            url_signing_secret: vars.optional("URL_SIGNING_SECRET").unwrap_or_else(|| jwt_secret.clone()),
            jwt_secret,
            signed_url_ttl: Duration::from_secs(vars.parse_or("SIGNED_URL_TTL_SECS", 600u64)?),
            max_upload_bytes: vars.parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            request_timeout: Duration::from_secs(vars.parse_or("REQUEST_TIMEOUT_SECS", 15u64)?),
            upload_timeout: Duration::from_secs(vars.parse_or("UPLOAD_TIMEOUT_SECS", 90u64)?),
            cors_allowed_origins: vars
                .optional("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_json: vars
                .optional("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<'a, F> Vars<'a, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn require(&self, name: &str) -> Result<String> {
        self.optional(name)
            .ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
    }

    fn parse_or<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
            None => Ok(default),
        }
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.server_address, "0.0.0.0:8080");
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.storage_bucket, "documents");
        assert_eq!(config.signed_url_ttl, Duration::from_secs(600));
        assert_eq!(config.max_upload_bytes, 15 * 1024 * 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.upload_timeout, Duration::from_secs(90));
        assert_eq!(config.url_signing_secret, "secret");
        assert!(config.cors_allowed_origins.is_empty());
        assert!(!config.log_json);
    }

    #[test]
    fn missing_jwt_secret_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/app")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("JWT_SECRET")));
    }

    #[test]
    fn supabase_backend_requires_credentials() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("JWT_SECRET", "secret"),
            ("STORAGE_BACKEND", "supabase"),
            ("SUPABASE_URL", "https://project.supabase.co"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn parses_origins_and_numeric_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("JWT_SECRET", "secret"),
            ("PUBLIC_BASE_URL", "https://api.example.com/"),
            ("CORS_ALLOWED_ORIGINS", "https://app.example.com, https://admin.example.com,"),
            ("SIGNED_URL_TTL_SECS", "120"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.public_base_url, "https://api.example.com");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
        assert_eq!(config.signed_url_ttl, Duration::from_secs(120));
        assert!(config.log_json);
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("JWT_SECRET", "secret"),
            ("MAX_UPLOAD_BYTES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("MAX_UPLOAD_BYTES")));
    }
}
