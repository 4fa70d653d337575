//! Image transform collaborator: the external generative-AI model.
//!
//! The Gemini client in `elfcast-genai` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;

/// One image-to-image request.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Source image bytes.
    pub image: Vec<u8>,
    /// MIME type of `image`.
    pub mime_type: String,
    /// Styling instruction for the model.
    pub prompt: String,
}

/// An image returned by the model.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Errors from a single transform attempt. All of them are retryable.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The request never completed (network, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(String),

    /// The model API answered with a non-2xx status.
    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no image (no candidate, no parts, or no
    /// inline-image part).
    #[error("Model returned no image: {0}")]
    NoImage(String),

    /// The response could not be decoded.
    #[error("Malformed model response: {0}")]
    Malformed(String),

    /// The attempt did not finish within its deadline.
    #[error("Model call timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

/// Turns a photo into a stylized image.
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    async fn transform(&self, request: &TransformRequest) -> Result<GeneratedImage, TransformError>;
}
