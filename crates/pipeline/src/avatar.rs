//! Avatar pipeline: source photo in, normalized avatar out.
//!
//! One invocation per uploaded photo. Every external failure is caught at
//! [`AvatarPipeline::handle_upload`]: with a known player the record falls
//! back to the placeholder avatar and `failed`, and the caller always gets a
//! [`PipelineOutcome`] rather than an error.

use std::sync::Arc;
use std::time::Duration;

use elfcast_core::blob::{BlobStore, ObjectMetadata};
use elfcast_core::error::CoreError;
use elfcast_core::imaging::normalize_avatar;
use elfcast_core::notification::ObjectFinalized;
use elfcast_core::paths::{
    avatar_path, is_photo_upload, player_id_from_path, sniff_image_mime, AVATAR_CONTENT_TYPE,
};
use elfcast_core::player::{GenerationStatus, PlayerUpdate};
use elfcast_core::retry::{with_retry, RetryPolicy};
use elfcast_core::settings::{resolve_placeholder, resolve_prompt};
use elfcast_core::store::{PlayerStore, SettingsStore};
use elfcast_core::transform::{ImageTransformer, TransformError, TransformRequest};
use elfcast_core::types::PlayerId;
use serde::Serialize;

use crate::error::PipelineError;

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The object was not a player photo; nothing was touched.
    Skipped { path: String },

    #[serde(rename_all = "camelCase")]
    Completed {
        player_id: PlayerId,
        avatar_url: String,
    },

    /// Generation failed. `player_id` is `None` when the path did not name
    /// a player, in which case no record was updated.
    #[serde(rename_all = "camelCase")]
    Failed {
        player_id: Option<PlayerId>,
        error: String,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Deadline for a single model call.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(90);

pub struct AvatarPipeline {
    players: Arc<dyn PlayerStore>,
    settings: Arc<dyn SettingsStore>,
    blobs: Arc<dyn BlobStore>,
    transformer: Arc<dyn ImageTransformer>,
    retry: RetryPolicy,
    attempt_timeout: Duration,
}

impl AvatarPipeline {
    pub fn new(
        players: Arc<dyn PlayerStore>,
        settings: Arc<dyn SettingsStore>,
        blobs: Arc<dyn BlobStore>,
        transformer: Arc<dyn ImageTransformer>,
    ) -> Self {
        Self {
            players,
            settings,
            blobs,
            transformer,
            retry: RetryPolicy::default(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// A stalled model call counts as one failed attempt after `timeout`.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Handle an object-created notification.
    pub async fn handle_upload(&self, notification: &ObjectFinalized) -> PipelineOutcome {
        let path = notification.path.as_str();
        if !is_photo_upload(path, notification.content_type.as_deref()) {
            tracing::debug!(path, content_type = ?notification.content_type, "Not a player photo, skipping");
            return PipelineOutcome::Skipped {
                path: path.to_string(),
            };
        }

        let player_id = match player_id_from_path(path) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(path, error = %e, "Cannot resolve player for upload");
                return PipelineOutcome::Failed {
                    player_id: None,
                    error: e.to_string(),
                };
            }
        };

        tracing::info!(player_id = %player_id, path, "Generating avatar");

        match self.generate(&player_id, path).await {
            Ok(avatar_url) => {
                tracing::info!(player_id = %player_id, avatar_url = %avatar_url, "Avatar generated");
                PipelineOutcome::Completed {
                    player_id,
                    avatar_url,
                }
            }
            Err(e) => {
                tracing::error!(player_id = %player_id, error = %e, "Avatar generation failed");
                self.fall_back(&player_id).await;
                PipelineOutcome::Failed {
                    player_id: Some(player_id),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn generate(&self, player_id: &str, photo_path: &str) -> Result<String, PipelineError> {
        let prompt = self.load_prompt().await;

        let photo = self.blobs.download(photo_path).await?;
        let request = TransformRequest {
            mime_type: sniff_image_mime(&photo).to_string(),
            image: photo,
            prompt,
        };

        let transformer = &self.transformer;
        let request = &request;
        let timeout = self.attempt_timeout;
        let generated = with_retry(&self.retry, "image transform", move |_| async move {
            tokio::time::timeout(timeout, transformer.transform(request))
                .await
                .unwrap_or(Err(TransformError::TimedOut(timeout)))
        })
        .await?;

        let png = tokio::task::spawn_blocking(move || normalize_avatar(&generated.bytes))
            .await
            .map_err(|e| CoreError::Internal(format!("Avatar normalization task failed: {e}")))??;

        let destination = avatar_path(player_id);
        self.blobs
            .upload(&destination, png, AVATAR_CONTENT_TYPE, &ObjectMetadata::new())
            .await?;
        let avatar_url = self.blobs.read_url(&destination).await?;

        self.players
            .update_player(
                player_id,
                &PlayerUpdate::generation_outcome(avatar_url.clone(), GenerationStatus::Completed),
            )
            .await?;

        Ok(avatar_url)
    }

    /// Current prompt. A failed settings read falls back to the default.
    async fn load_prompt(&self) -> String {
        match self.settings.get_settings().await {
            Ok(record) => resolve_prompt(record.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read avatar settings, using default prompt");
                resolve_prompt(None)
            }
        }
    }

    /// Record the placeholder avatar and `failed`. Errors are only logged.
    async fn fall_back(&self, player_id: &str) {
        let placeholder = match self.settings.get_settings().await {
            Ok(record) => resolve_placeholder(record.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read avatar settings, using default placeholder");
                resolve_placeholder(None)
            }
        };

        let update = PlayerUpdate::generation_outcome(placeholder, GenerationStatus::Failed);
        if let Err(e) = self.players.update_player(player_id, &update).await {
            tracing::error!(player_id, error = %e, "Failed to record avatar failure");
        }
    }
}
