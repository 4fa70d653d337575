#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use elfcast_api::config::{DocumentStoreKind, ServerConfig};
use elfcast_api::router::build_app_router;
use elfcast_api::state::AppState;
use elfcast_cloud::MemoryBlobStore;
use elfcast_core::transform::{GeneratedImage, ImageTransformer, TransformError, TransformRequest};
use elfcast_db::MemoryDocumentStore;
use elfcast_pipeline::{AvatarPipeline, PlayerService, RegenerationTrigger};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

pub const FILES_URL: &str = "http://localhost:3000/files";
pub const BOUNDARY: &str = "elfcast-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        document_store: DocumentStoreKind::Memory,
        in_process_triggers: false,
    }
}

/// Transformer that returns a fixed small PNG.
pub struct StubTransformer;

#[async_trait]
impl ImageTransformer for StubTransformer {
    async fn transform(&self, _request: &TransformRequest) -> Result<GeneratedImage, TransformError> {
        Ok(GeneratedImage {
            bytes: encode(80, 60, ImageFormat::Png),
            mime_type: "image/png".into(),
        })
    }
}

/// Test application plus handles on its in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub docs: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

/// Build the full application router on in-memory stores. Triggers are not
/// wired in-process; tests drive them through the webhooks.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let docs = Arc::new(MemoryDocumentStore::new());
    let blobs = Arc::new(MemoryBlobStore::new(FILES_URL));

    let pipeline = Arc::new(AvatarPipeline::new(
        docs.clone(),
        docs.clone(),
        blobs.clone(),
        Arc::new(StubTransformer),
    ));
    let regeneration = Arc::new(RegenerationTrigger::new(docs.clone(), blobs.clone()));
    let players = Arc::new(PlayerService::new(docs.clone(), docs.clone(), blobs.clone()));

    let state = AppState {
        pool: None,
        players,
        pipeline,
        regeneration,
    };

    TestApp {
        router: build_app_router(state, &config, None),
        docs,
        blobs,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send_json(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// One multipart form part.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

pub fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: &TestApp,
    method: Method,
    uri: &str,
    parts: Vec<Part<'_>>,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| Rgb([x as u8, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn jpeg_photo() -> Vec<u8> {
    encode(40, 30, ImageFormat::Jpeg)
}

/// Register a player through the API and return its JSON record.
pub async fn register(app: &TestApp, name: &str) -> serde_json::Value {
    let response = send_multipart(
        app,
        Method::POST,
        "/api/v1/players",
        vec![
            Part::Text("name", name),
            Part::File {
                name: "photo",
                content_type: "image/jpeg",
                bytes: jpeg_photo(),
            },
        ],
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}
