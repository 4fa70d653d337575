//! Blob store backends.
//!
//! - [`S3BlobStore`]: Amazon S3 or an S3-compatible service.
//! - [`LocalBlobStore`]: a directory on disk, served over HTTP by the API.
//! - [`MemoryBlobStore`]: process-local map for tests.
//!
//! [`StorageConfig`] selects and builds one from the environment.

pub mod config;
pub mod local;
pub mod memory;
pub mod s3;

pub use config::{StorageBackend, StorageConfig, StorageConfigError};
pub use local::LocalBlobStore;
pub use memory::{BlobOp, MemoryBlobStore};
pub use s3::S3BlobStore;
