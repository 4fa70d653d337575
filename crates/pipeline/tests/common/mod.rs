#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use elfcast_cloud::MemoryBlobStore;
use elfcast_core::blob::{BlobError, BlobStore, ObjectMetadata};
use elfcast_core::player::{NewPlayer, Player};
use elfcast_core::store::{SettingsStore, StoreError};
use elfcast_core::transform::{GeneratedImage, ImageTransformer, TransformError, TransformRequest};
use elfcast_db::MemoryDocumentStore;
use elfcast_pipeline::{AvatarPipeline, PlayerService, RegenerationTrigger};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Base URL the memory blob store hands out read URLs under.
pub const FILES_URL: &str = "http://files.test";

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn jpeg_photo() -> Vec<u8> {
    encode(64, 48, ImageFormat::Jpeg)
}

pub fn png_image(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

// ---------------------------------------------------------------------------
// Scripted transformer
// ---------------------------------------------------------------------------

/// Image transformer that fails a fixed number of times, then returns a
/// small landscape PNG.
pub struct ScriptedTransformer {
    failures: u32,
    output: Vec<u8>,
    calls: AtomicU32,
    requests: Mutex<Vec<TransformRequest>>,
}

impl ScriptedTransformer {
    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures,
            output: png_image(96, 64),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::failing_times(0)
    }

    pub fn always_failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    /// Succeeds with bytes that are not an image.
    pub fn returning_garbage() -> Self {
        Self {
            output: b"not an image".to_vec(),
            ..Self::succeeding()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<TransformRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ImageTransformer for ScriptedTransformer {
    async fn transform(&self, request: &TransformRequest) -> Result<GeneratedImage, TransformError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if call < self.failures {
            return Err(TransformError::Api {
                status: 503,
                body: format!("overloaded (call {call})"),
            });
        }
        Ok(GeneratedImage {
            bytes: self.output.clone(),
            mime_type: "image/png".into(),
        })
    }
}

/// Image transformer whose calls never complete.
#[derive(Default)]
pub struct StalledTransformer {
    calls: AtomicU32,
}

impl StalledTransformer {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageTransformer for StalledTransformer {
    async fn transform(&self, _request: &TransformRequest) -> Result<GeneratedImage, TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Settings store that cannot be read
// ---------------------------------------------------------------------------

pub struct UnreadableSettings;

#[async_trait]
impl SettingsStore for UnreadableSettings {
    async fn get_settings(&self) -> Result<Option<serde_json::Value>, StoreError> {
        Err(StoreError::Backend("connection reset".into()))
    }

    async fn merge_settings(
        &self,
        _fields: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError> {
        Err(StoreError::Backend("connection reset".into()))
    }
}

// ---------------------------------------------------------------------------
// Blob store whose uploads always fail
// ---------------------------------------------------------------------------

pub struct FailingUploads(pub MemoryBlobStore);

#[async_trait]
impl BlobStore for FailingUploads {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        self.0.download(path).await
    }

    async fn upload(
        &self,
        path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
        _metadata: &ObjectMetadata,
    ) -> Result<(), BlobError> {
        Err(BlobError::Backend(format!("disk full writing {path}")))
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        self.0.exists(path).await
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.0.delete(path).await
    }

    async fn read_url(&self, path: &str) -> Result<String, BlobError> {
        self.0.read_url(path).await
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub struct Harness {
    pub docs: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub transformer: Arc<ScriptedTransformer>,
}

impl Harness {
    pub fn new(transformer: ScriptedTransformer) -> Self {
        Self::with_docs(MemoryDocumentStore::new(), transformer)
    }

    pub fn with_settings(settings: serde_json::Value, transformer: ScriptedTransformer) -> Self {
        Self::with_docs(MemoryDocumentStore::with_settings(settings), transformer)
    }

    fn with_docs(docs: MemoryDocumentStore, transformer: ScriptedTransformer) -> Self {
        Self {
            docs: Arc::new(docs),
            blobs: Arc::new(MemoryBlobStore::new(FILES_URL)),
            transformer: Arc::new(transformer),
        }
    }

    pub fn pipeline(&self) -> AvatarPipeline {
        AvatarPipeline::new(
            self.docs.clone(),
            self.docs.clone(),
            self.blobs.clone(),
            self.transformer.clone(),
        )
    }

    /// Pipeline over this harness's records and blobs with a different
    /// settings store and transformer.
    pub fn pipeline_with(
        &self,
        settings: Arc<dyn SettingsStore>,
        transformer: Arc<dyn ImageTransformer>,
    ) -> AvatarPipeline {
        AvatarPipeline::new(self.docs.clone(), settings, self.blobs.clone(), transformer)
    }

    pub fn regeneration(&self) -> RegenerationTrigger {
        RegenerationTrigger::new(self.docs.clone(), self.blobs.clone())
    }

    pub fn service(&self) -> PlayerService {
        PlayerService::new(self.docs.clone(), self.docs.clone(), self.blobs.clone())
    }

    /// Insert player `id` and its source photo at `player-photos/{id}.{ext}`.
    pub async fn seed_player(&self, id: &str, ext: &str) -> Player {
        let path = format!("player-photos/{id}.{ext}");
        self.blobs.seed(&path, jpeg_photo(), "image/jpeg").await;
        self.seed_record(id).await
    }

    /// Insert player `id` without any photo.
    pub async fn seed_record(&self, id: &str) -> Player {
        use elfcast_core::store::PlayerStore;

        self.docs
            .insert_player(NewPlayer {
                id: id.to_string(),
                name: format!("Player {id}"),
                original_photo_url: format!("{FILES_URL}/player-photos/{id}.jpg"),
            })
            .await
            .unwrap()
    }

    pub async fn player(&self, id: &str) -> Player {
        use elfcast_core::store::PlayerStore;

        self.docs.get_player(id).await.unwrap().expect("player exists")
    }
}
