//! Blob backend selection.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use elfcast_core::blob::BlobStore;

use crate::{LocalBlobStore, MemoryBlobStore, S3BlobStore};

#[derive(Debug, thiserror::Error)]
pub enum StorageConfigError {
    #[error("Unknown STORAGE_BACKEND '{0}' (expected local, s3 or memory)")]
    UnknownBackend(String),

    #[error("{0} must be set when STORAGE_BACKEND=s3")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = StorageConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(StorageConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend.
    pub root: PathBuf,
    /// Base URL the API serves local files under.
    pub public_files_url: String,
    pub s3_bucket: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub s3_endpoint_url: Option<String>,
    pub s3_public_acl: bool,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var              | Default                              |
    /// |----------------------|--------------------------------------|
    /// | `STORAGE_BACKEND`    | `local`                              |
    /// | `STORAGE_ROOT`       | `./storage`                          |
    /// | `PUBLIC_FILES_URL`   | `http://localhost:3000/files`        |
    /// | `S3_BUCKET`          | (required for `s3`)                  |
    /// | `S3_PUBLIC_BASE_URL` | `https://{bucket}.s3.amazonaws.com`  |
    /// | `S3_ENDPOINT_URL`    | (unset)                              |
    /// | `S3_PUBLIC_ACL`      | `false`                              |
    pub fn from_env() -> Result<Self, StorageConfigError> {
        let backend = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .parse()?;

        let root = std::env::var("STORAGE_ROOT")
            .unwrap_or_else(|_| "./storage".into())
            .into();

        let public_files_url = std::env::var("PUBLIC_FILES_URL")
            .unwrap_or_else(|_| "http://localhost:3000/files".into());

        let s3_public_acl = std::env::var("S3_PUBLIC_ACL")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            backend,
            root,
            public_files_url,
            s3_bucket: non_empty_var("S3_BUCKET"),
            s3_public_base_url: non_empty_var("S3_PUBLIC_BASE_URL"),
            s3_endpoint_url: non_empty_var("S3_ENDPOINT_URL"),
            s3_public_acl,
        })
    }

    /// Construct the configured blob store.
    pub async fn build(&self) -> Result<Arc<dyn BlobStore>, StorageConfigError> {
        let store: Arc<dyn BlobStore> = match self.backend {
            StorageBackend::Local => Arc::new(LocalBlobStore::new(
                self.root.clone(),
                self.public_files_url.clone(),
            )),
            StorageBackend::Memory => Arc::new(MemoryBlobStore::new(self.public_files_url.clone())),
            StorageBackend::S3 => {
                let bucket = self
                    .s3_bucket
                    .clone()
                    .ok_or(StorageConfigError::Missing("S3_BUCKET"))?;
                let public_base_url = self
                    .s3_public_base_url
                    .clone()
                    .unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));
                Arc::new(
                    S3BlobStore::from_env(
                        bucket,
                        public_base_url,
                        self.s3_endpoint_url.clone(),
                        self.s3_public_acl,
                    )
                    .await,
                )
            }
        };
        tracing::info!(backend = ?self.backend, "Blob store configured");
        Ok(store)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
