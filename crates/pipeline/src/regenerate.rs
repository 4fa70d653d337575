//! Regeneration trigger.
//!
//! Reacts to a player update that raised `regenerateRequested`. The request
//! is consumed first (status back to `pending`, flag cleared), then the
//! source photo is rewritten in place. That rewrite is an ordinary upload,
//! so the avatar pipeline picks it up like any other.

use std::sync::Arc;

use elfcast_core::blob::{BlobStore, ObjectMetadata};
use elfcast_core::paths::{content_type_for_path, photo_path_candidates};
use elfcast_core::player::{PlayerChange, PlayerUpdate};
use elfcast_core::store::PlayerStore;
use elfcast_core::types::PlayerId;
use serde::Serialize;

use crate::error::PipelineError;

/// Metadata key stamped on a photo re-uploaded for regeneration.
pub const REGENERATED_AT_METADATA: &str = "regeneratedAt";

/// Result of handling one player update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RegenerationOutcome {
    /// The update did not raise the regeneration flag.
    #[serde(rename_all = "camelCase")]
    Skipped { player_id: PlayerId },

    /// The source photo was re-uploaded; the pipeline takes it from here.
    #[serde(rename_all = "camelCase")]
    Requeued {
        player_id: PlayerId,
        photo_path: String,
    },

    #[serde(rename_all = "camelCase")]
    Failed { player_id: PlayerId, error: String },
}

pub struct RegenerationTrigger {
    players: Arc<dyn PlayerStore>,
    blobs: Arc<dyn BlobStore>,
}

impl RegenerationTrigger {
    pub fn new(players: Arc<dyn PlayerStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { players, blobs }
    }

    /// Handle a player-updated notification.
    pub async fn handle_update(&self, change: &PlayerChange) -> RegenerationOutcome {
        let player_id = change.after.id.clone();
        if !change.requests_regeneration() {
            return RegenerationOutcome::Skipped { player_id };
        }

        tracing::info!(player_id = %player_id, "Avatar regeneration requested");

        // Consume the request before any blob I/O.
        if let Err(e) = self
            .players
            .update_player(&player_id, &PlayerUpdate::regeneration_started())
            .await
        {
            tracing::error!(player_id = %player_id, error = %e, "Failed to reset generation status");
            return RegenerationOutcome::Failed {
                player_id,
                error: e.to_string(),
            };
        }

        match self.reupload_photo(&player_id).await {
            Ok(photo_path) => {
                tracing::info!(player_id = %player_id, photo_path = %photo_path, "Source photo re-uploaded");
                RegenerationOutcome::Requeued {
                    player_id,
                    photo_path,
                }
            }
            Err(e) => {
                tracing::error!(player_id = %player_id, error = %e, "Avatar regeneration failed");
                if let Err(update_err) = self
                    .players
                    .update_player(&player_id, &PlayerUpdate::regeneration_failed())
                    .await
                {
                    tracing::error!(
                        player_id = %player_id,
                        error = %update_err,
                        "Failed to record regeneration failure"
                    );
                }
                RegenerationOutcome::Failed {
                    player_id,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn reupload_photo(&self, player_id: &str) -> Result<String, PipelineError> {
        let photo_path = self
            .find_original_photo(player_id)
            .await?
            .ok_or_else(|| PipelineError::PhotoMissing(player_id.to_string()))?;

        let bytes = self.blobs.download(&photo_path).await?;

        let mut metadata = ObjectMetadata::new();
        metadata.insert(
            REGENERATED_AT_METADATA.to_string(),
            chrono::Utc::now().to_rfc3339(),
        );
        self.blobs
            .upload(&photo_path, bytes, content_type_for_path(&photo_path), &metadata)
            .await?;

        Ok(photo_path)
    }

    /// First existing candidate among the canonical photo paths.
    async fn find_original_photo(&self, player_id: &str) -> Result<Option<String>, PipelineError> {
        for candidate in photo_path_candidates(player_id) {
            if self.blobs.exists(&candidate).await? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
