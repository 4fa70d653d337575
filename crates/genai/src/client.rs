//! REST client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use elfcast_core::transform::{GeneratedImage, ImageTransformer, TransformError, TransformRequest};

use crate::config::GeminiConfig;
use crate::messages::{ExtractError, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for a single Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client whose requests give up after `config.timeout`.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling, custom
    /// timeouts).
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one `generateContent` call and parse the response body.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransformError> {
        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransformError::TimedOut(self.config.timeout)
                } else {
                    TransformError::Request(e.to_string())
                }
            })?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| TransformError::Malformed(e.to_string()))
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransformError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransformError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageTransformer for GeminiClient {
    async fn transform(&self, request: &TransformRequest) -> Result<GeneratedImage, TransformError> {
        let body =
            GenerateContentRequest::image_edit(&request.image, &request.mime_type, &request.prompt);

        tracing::debug!(
            model = %self.config.model,
            input_size = request.image.len(),
            mime_type = %request.mime_type,
            "Requesting avatar generation",
        );

        let response = self.generate(&body).await?;
        let (bytes, mime_type) = response.first_image().map_err(|e| match e {
            ExtractError::NoImage(detail) => TransformError::NoImage(detail),
            ExtractError::BadEncoding(detail) => TransformError::Malformed(detail),
        })?;

        tracing::debug!(output_size = bytes.len(), %mime_type, "Model returned image");
        Ok(GeneratedImage { bytes, mime_type })
    }
}
