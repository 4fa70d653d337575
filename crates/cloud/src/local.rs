//! Blob store on the local filesystem.
//!
//! Objects are files under a root directory; read URLs point at the API's
//! static file route (`PUBLIC_FILES_URL`). Custom metadata is accepted but
//! not persisted.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use elfcast_core::blob::{BlobError, BlobStore, ObjectMetadata};

pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object path below the root, rejecting absolute paths and
    /// parent-directory components.
    fn resolve(&self, path: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(path);
        let is_safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_safe {
            return Err(BlobError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// Sibling temp file for `file`: `p1.jpg` writes through `p1.jpg.partial`,
/// so objects differing only by extension never share one.
fn partial_path(file: &Path) -> PathBuf {
    let mut name = file.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    file.with_file_name(name)
}

fn io_error(path: &str, e: std::io::Error) -> BlobError {
    if e.kind() == std::io::ErrorKind::NotFound {
        BlobError::NotFound(path.to_string())
    } else {
        BlobError::Backend(format!("{path}: {e}"))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        let file = self.resolve(path)?;
        tokio::fs::read(&file).await.map_err(|e| io_error(path, e))
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        _metadata: &ObjectMetadata,
    ) -> Result<(), BlobError> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(path, e))?;
        }

        // Write to a sibling temp file and rename so readers never observe a
        // partially written object.
        let tmp = partial_path(&file);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| io_error(path, e))?;
        tokio::fs::rename(&tmp, &file)
            .await
            .map_err(|e| io_error(path, e))?;

        tracing::debug!(path, size = bytes.len(), "Stored object on local disk");
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        let file = self.resolve(path)?;
        tokio::fs::try_exists(&file)
            .await
            .map_err(|e| io_error(path, e))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        let file = self.resolve(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(path, e)),
        }
    }

    async fn read_url(&self, path: &str) -> Result<String, BlobError> {
        self.resolve(path)?;
        Ok(format!("{}/{path}", self.public_base_url))
    }
}
