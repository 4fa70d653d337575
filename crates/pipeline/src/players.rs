//! Player administration: registration, edits, deletion and settings.

use std::sync::Arc;

use elfcast_core::blob::{BlobStore, ObjectMetadata};
use elfcast_core::error::CoreError;
use elfcast_core::paths::{avatar_path, photo_path, photo_path_candidates};
use elfcast_core::player::{NewPlayer, Player, PlayerStatus, PlayerUpdate};
use elfcast_core::settings::{AvatarSettings, PROMPT_FIELD};
use elfcast_core::store::{PlayerStore, SettingsStore};
use elfcast_core::validation::{validate_photo, validate_player_name, validate_prompt};
use serde::Serialize;

use crate::error::PipelineError;

/// An uploaded source photo.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Answer of the callable regeneration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationResponse {
    pub success: bool,
    /// Avatar on record when the request was accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegenerationResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            avatar_url: None,
            error: Some(error.into()),
        }
    }
}

pub struct PlayerService {
    players: Arc<dyn PlayerStore>,
    settings: Arc<dyn SettingsStore>,
    blobs: Arc<dyn BlobStore>,
}

impl PlayerService {
    pub fn new(
        players: Arc<dyn PlayerStore>,
        settings: Arc<dyn SettingsStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            players,
            settings,
            blobs,
        }
    }

    // ---- players ----

    /// Register a player and upload their source photo.
    ///
    /// The record is inserted first so that the pipeline, fired by the
    /// upload, always finds it. A failed upload deletes the record again.
    pub async fn register(&self, name: &str, photo: PhotoUpload) -> Result<Player, PipelineError> {
        let name = validate_player_name(name)?;
        let extension = validate_photo(&photo.content_type, photo.bytes.len())?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let path = photo_path(&id, extension);
        let original_photo_url = self.blobs.read_url(&path).await?;

        let player = self
            .players
            .insert_player(NewPlayer {
                id,
                name,
                original_photo_url,
            })
            .await?;

        if let Err(e) = self
            .blobs
            .upload(&path, photo.bytes, &photo.content_type, &ObjectMetadata::new())
            .await
        {
            tracing::error!(player_id = %player.id, error = %e, "Photo upload failed, removing player");
            if let Err(delete_err) = self.players.delete_player(&player.id).await {
                tracing::error!(player_id = %player.id, error = %delete_err, "Failed to remove player");
            }
            return Err(e.into());
        }

        tracing::info!(player_id = %player.id, path = %path, "Player registered");
        Ok(player)
    }

    pub async fn list(&self) -> Result<Vec<Player>, PipelineError> {
        Ok(self.players.list_players().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Player, PipelineError> {
        self.players
            .get_player(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Rename a player and/or replace their source photo.
    ///
    /// A new photo goes through the normal upload path and so re-fires
    /// avatar generation. Stale photos under other extensions are removed
    /// best-effort.
    pub async fn update_details(
        &self,
        id: &str,
        name: Option<&str>,
        photo: Option<PhotoUpload>,
    ) -> Result<Player, PipelineError> {
        let current = self.get(id).await?;

        let mut update = PlayerUpdate {
            name: name.map(validate_player_name).transpose()?,
            ..Default::default()
        };

        let new_photo = match photo {
            Some(photo) => {
                let extension = validate_photo(&photo.content_type, photo.bytes.len())?;
                Some((photo_path(id, extension), photo))
            }
            None => None,
        };

        if let Some((path, photo)) = new_photo {
            self.blobs
                .upload(&path, photo.bytes, &photo.content_type, &ObjectMetadata::new())
                .await?;
            update.original_photo_url = Some(self.blobs.read_url(&path).await?);
            self.remove_photos(id, Some(&path)).await;
        }

        if update.is_empty() {
            return Ok(current);
        }
        let change = self.players.update_player(id, &update).await?;
        Ok(change.after)
    }

    pub async fn set_status(&self, id: &str, status: PlayerStatus) -> Result<Player, PipelineError> {
        let update = PlayerUpdate {
            status: Some(status),
            ..Default::default()
        };
        let change = self.players.update_player(id, &update).await?;
        tracing::info!(player_id = %id, status = %status, "Player status changed");
        Ok(change.after)
    }

    /// Delete the record, then its photo and avatar blobs best-effort.
    pub async fn delete(&self, id: &str) -> Result<(), PipelineError> {
        if !self.players.delete_player(id).await? {
            return Err(not_found(id));
        }

        self.remove_photos(id, None).await;
        let avatar = avatar_path(id);
        if let Err(e) = self.blobs.delete(&avatar).await {
            tracing::warn!(player_id = %id, path = %avatar, error = %e, "Failed to delete avatar");
        }

        tracing::info!(player_id = %id, "Player deleted");
        Ok(())
    }

    /// Raise the regeneration flag on a player.
    ///
    /// A flag left raised by an earlier, unfinished request is lowered first
    /// so this request is seen as a fresh edge.
    pub async fn request_regeneration(
        &self,
        player_id: &str,
        original_photo_url: Option<&str>,
    ) -> RegenerationResponse {
        if player_id.trim().is_empty() {
            return RegenerationResponse::failure("playerId is required");
        }
        tracing::info!(player_id, original_photo_url, "Regeneration requested");

        match self.raise_regeneration_flag(player_id).await {
            Ok(player) => RegenerationResponse {
                success: true,
                avatar_url: player.avatar_url,
                error: None,
            },
            Err(e) => {
                tracing::error!(player_id, error = %e, "Failed to request regeneration");
                RegenerationResponse::failure(e.to_string())
            }
        }
    }

    async fn raise_regeneration_flag(&self, player_id: &str) -> Result<Player, PipelineError> {
        let current = self.get(player_id).await?;
        if current.regenerate_requested {
            let lower = PlayerUpdate {
                regenerate_requested: Some(false),
                ..Default::default()
            };
            self.players.update_player(player_id, &lower).await?;
        }
        let change = self
            .players
            .update_player(player_id, &PlayerUpdate::request_regeneration())
            .await?;
        Ok(change.after)
    }

    /// Delete every candidate photo of a player except `keep`.
    async fn remove_photos(&self, id: &str, keep: Option<&str>) {
        for path in photo_path_candidates(id) {
            if Some(path.as_str()) == keep {
                continue;
            }
            match self.blobs.exists(&path).await {
                Ok(true) => {
                    if let Err(e) = self.blobs.delete(&path).await {
                        tracing::warn!(player_id = %id, path = %path, error = %e, "Failed to delete photo");
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(player_id = %id, path = %path, error = %e, "Failed to probe photo");
                }
            }
        }
    }

    // ---- settings ----

    /// Settings with defaults filled in.
    pub async fn get_settings(&self) -> Result<AvatarSettings, PipelineError> {
        let record = self.settings.get_settings().await?;
        Ok(AvatarSettings::from_record(record.as_ref()))
    }

    /// Replace the avatar prompt, creating the record with defaults when
    /// it does not exist yet.
    pub async fn update_prompt(&self, prompt: &str) -> Result<AvatarSettings, PipelineError> {
        let prompt = validate_prompt(prompt)?;

        let fields = match self.settings.get_settings().await? {
            Some(_) => serde_json::json!({ PROMPT_FIELD: prompt }),
            None => AvatarSettings {
                avatar_prompt: prompt,
                ..Default::default()
            }
            .to_record(),
        };

        let merged = self.settings.merge_settings(fields).await?;
        tracing::info!("Avatar prompt updated");
        Ok(AvatarSettings::from_record(Some(&merged)))
    }
}

fn not_found(id: &str) -> PipelineError {
    CoreError::NotFound {
        entity: "Player",
        id: id.to_string(),
    }
    .into()
}
