//! Blob store collaborator: source photos and generated avatars.
//!
//! Implementations live in `elfcast-cloud` (S3, local filesystem,
//! in-memory).

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Errors raised by a blob store backend.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// No object exists at the given path.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The path is not a valid object key for this backend.
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    /// The backend itself failed (network, permissions, I/O).
    #[error("Blob store error: {0}")]
    Backend(String),
}

/// Custom metadata attached to an uploaded object.
pub type ObjectMetadata = BTreeMap<String, String>;

/// Path-addressed object storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Download the full payload stored at `path`.
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError>;

    /// Store `bytes` at `path`, replacing any existing object.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), BlobError>;

    /// Whether an object exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, BlobError>;

    /// Remove the object at `path`. Removing a missing object is not an error.
    async fn delete(&self, path: &str) -> Result<(), BlobError>;

    /// A durable URL that resolves to the object without further
    /// authorization.
    async fn read_url(&self, path: &str) -> Result<String, BlobError>;
}
