//! S3 blob store.
//!
//! Objects are addressed by their path as the S3 key. Read URLs are plain
//! public URLs under [`S3BlobStore::public_base_url`]; the bucket (or a CDN
//! in front of it) must allow anonymous reads of the avatar and photo
//! prefixes, or uploads must be written with the `public-read` ACL.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use elfcast_core::blob::{BlobError, BlobStore, ObjectMetadata};

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
    public_acl: bool,
}

impl S3BlobStore {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: String,
        public_base_url: String,
        public_acl: bool,
    ) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            public_acl,
        }
    }

    /// Build a client from the ambient AWS configuration (env vars,
    /// profile, instance role). `endpoint_url` targets S3-compatible
    /// services and switches to path-style addressing.
    pub async fn from_env(
        bucket: String,
        public_base_url: String,
        endpoint_url: Option<String>,
        public_acl: bool,
    ) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());
        Self::new(client, bucket, public_base_url, public_acl)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                GetObjectError::NoSuchKey(_) => BlobError::NotFound(path.to_string()),
                other => BlobError::Backend(format!("GetObject {path}: {other}")),
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Backend(format!("Reading body of {path}: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), BlobError> {
        let size = bytes.len();
        let metadata: HashMap<String, String> = metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .set_metadata(Some(metadata))
            .body(ByteStream::from(bytes));
        if self.public_acl {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request
            .send()
            .await
            .map_err(|e| BlobError::Backend(format!("PutObject {path}: {}", e.into_service_error())))?;

        tracing::debug!(bucket = %self.bucket, path, size, "Uploaded object to S3");
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match e.into_service_error() {
                HeadObjectError::NotFound(_) => Ok(false),
                other => Err(BlobError::Backend(format!("HeadObject {path}: {other}"))),
            },
        }
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                BlobError::Backend(format!("DeleteObject {path}: {}", e.into_service_error()))
            })?;
        Ok(())
    }

    async fn read_url(&self, path: &str) -> Result<String, BlobError> {
        Ok(format!("{}/{path}", self.public_base_url))
    }
}
