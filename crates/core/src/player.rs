//! Player record, lifecycle/generation status enums, and partial updates.
//!
//! Records written by older schema versions may lack the status, avatar or
//! regeneration fields; serde defaults back-fill them on read (`status` →
//! `active`, `generationStatus` → `pending`, `avatarUrl` → null,
//! `regenerateRequested` → false).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{PlayerId, Timestamp};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Player lifecycle tag. Independent of [`GenerationStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Active,
    Inactive,
}

impl PlayerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for PlayerStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Unknown player status '{other}'. Must be one of: active, inactive"
            ))),
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of avatar generation for a player.
///
/// ```text
/// pending --pipeline ok--> completed
/// pending --pipeline err-> failed
/// completed|failed --regeneration request--> pending
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for GenerationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown generation status '{other}'. Must be one of: pending, completed, failed"
            ))),
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player record as held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub original_photo_url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: PlayerStatus,
    #[serde(default)]
    pub generation_status: GenerationStatus,
    #[serde(default)]
    pub regenerate_requested: bool,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,
}

/// Data for inserting a freshly registered player.
///
/// New players always start `active`, `pending`, with no avatar.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub id: PlayerId,
    pub name: String,
    pub original_photo_url: String,
}

impl NewPlayer {
    /// Build the full record this insert produces.
    pub fn into_player(self, created_at: Timestamp) -> Player {
        Player {
            id: self.id,
            name: self.name,
            original_photo_url: self.original_photo_url,
            avatar_url: None,
            status: PlayerStatus::Active,
            generation_status: GenerationStatus::Pending,
            regenerate_requested: false,
            created_at,
        }
    }
}

/// Partial update of a player record. `None` fields are left untouched.
///
/// `avatar_url` is doubly optional: `Some(None)` clears the avatar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub original_photo_url: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub status: Option<PlayerStatus>,
    pub generation_status: Option<GenerationStatus>,
    pub regenerate_requested: Option<bool>,
}

impl PlayerUpdate {
    /// Record the outcome of a pipeline invocation.
    pub fn generation_outcome(avatar_url: impl Into<String>, status: GenerationStatus) -> Self {
        Self {
            avatar_url: Some(Some(avatar_url.into())),
            generation_status: Some(status),
            ..Default::default()
        }
    }

    /// Consume a regeneration request: back to `pending`, flag cleared.
    pub fn regeneration_started() -> Self {
        Self {
            generation_status: Some(GenerationStatus::Pending),
            regenerate_requested: Some(false),
            ..Default::default()
        }
    }

    /// Record a failed regeneration, clearing the flag again.
    pub fn regeneration_failed() -> Self {
        Self {
            generation_status: Some(GenerationStatus::Failed),
            regenerate_requested: Some(false),
            ..Default::default()
        }
    }

    /// Ask for the avatar to be regenerated.
    pub fn request_regeneration() -> Self {
        Self {
            regenerate_requested: Some(true),
            ..Default::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply this update to an in-memory record.
    pub fn apply(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(url) = &self.original_photo_url {
            player.original_photo_url = url.clone();
        }
        if let Some(avatar_url) = &self.avatar_url {
            player.avatar_url = avatar_url.clone();
        }
        if let Some(status) = self.status {
            player.status = status;
        }
        if let Some(generation_status) = self.generation_status {
            player.generation_status = generation_status;
        }
        if let Some(flag) = self.regenerate_requested {
            player.regenerate_requested = flag;
        }
    }
}

// ---------------------------------------------------------------------------
// Change notification
// ---------------------------------------------------------------------------

/// Before/after snapshots of a single player update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerChange {
    pub before: Player,
    pub after: Player,
}

impl PlayerChange {
    /// Whether this update raised the regeneration flag.
    ///
    /// Only a falsy → `true` edge qualifies; `true → true` and anything
    /// ending falsy is not a request.
    pub fn requests_regeneration(&self) -> bool {
        !self.before.regenerate_requested && self.after.regenerate_requested
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
