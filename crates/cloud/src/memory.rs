//! In-memory blob store with an operation log.
//!
//! Used by tests to assert exactly which blob I/O a component performed.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use elfcast_core::blob::{BlobError, BlobStore, ObjectMetadata};
use tokio::sync::RwLock;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub metadata: ObjectMetadata,
}

/// One recorded blob operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobOp {
    Download(String),
    Upload(String),
    Exists(String),
    Delete(String),
}

pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    ops: Mutex<Vec<BlobOp>>,
    public_base_url: String,
}

impl MemoryBlobStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: RwLock::default(),
            ops: Mutex::default(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Place an object without recording an operation.
    pub async fn seed(&self, path: &str, bytes: Vec<u8>, content_type: &str) {
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                metadata: ObjectMetadata::new(),
            },
        );
    }

    /// The object currently stored at `path`.
    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Every operation performed so far, in order.
    pub fn ops(&self) -> Vec<BlobOp> {
        self.ops.lock().map(|ops| ops.clone()).unwrap_or_default()
    }

    fn record(&self, op: BlobOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://blobs")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        self.record(BlobOp::Download(path.to_string()));
        self.objects
            .read()
            .await
            .get(path)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| BlobError::NotFound(path.to_string()))
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), BlobError> {
        self.record(BlobOp::Upload(path.to_string()));
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                metadata: metadata.clone(),
            },
        );
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        self.record(BlobOp::Exists(path.to_string()));
        Ok(self.objects.read().await.contains_key(path))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.record(BlobOp::Delete(path.to_string()));
        self.objects.write().await.remove(path);
        Ok(())
    }

    async fn read_url(&self, path: &str) -> Result<String, BlobError> {
        Ok(format!("{}/{path}", self.public_base_url))
    }
}
