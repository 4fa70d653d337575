//! Player row model.

use elfcast_core::player::Player;
use elfcast_core::store::StoreError;
use elfcast_core::types::{PlayerId, Timestamp};
use sqlx::FromRow;

/// A row from the `players` table.
///
/// Status columns are stored as text and parsed into the domain enums by
/// [`PlayerRow::into_player`].
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub name: String,
    pub original_photo_url: String,
    pub avatar_url: Option<String>,
    pub status: String,
    pub generation_status: String,
    pub regenerate_requested: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlayerRow {
    /// Map onto the domain model, rejecting unknown status values.
    pub fn into_player(self) -> Result<Player, StoreError> {
        let status = self
            .status
            .parse()
            .map_err(|e| StoreError::Malformed(format!("player {}: {e}", self.id)))?;
        let generation_status = self
            .generation_status
            .parse()
            .map_err(|e| StoreError::Malformed(format!("player {}: {e}", self.id)))?;

        Ok(Player {
            id: self.id,
            name: self.name,
            original_photo_url: self.original_photo_url,
            avatar_url: self.avatar_url,
            status,
            generation_status,
            regenerate_requested: self.regenerate_requested,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use elfcast_core::player::{GenerationStatus, PlayerStatus};

    use super::*;

    fn row(status: &str, generation_status: &str) -> PlayerRow {
        let now = chrono::Utc::now();
        PlayerRow {
            id: "p1".into(),
            name: "Ada".into(),
            original_photo_url: "http://files/player-photos/p1.jpg".into(),
            avatar_url: None,
            status: status.into(),
            generation_status: generation_status.into(),
            regenerate_requested: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn maps_valid_row() {
        let player = row("inactive", "completed").into_player().unwrap();
        assert_eq!(player.status, PlayerStatus::Inactive);
        assert_eq!(player.generation_status, GenerationStatus::Completed);
    }

    #[test]
    fn unknown_status_is_malformed() {
        assert_matches!(
            row("processing", "pending").into_player(),
            Err(StoreError::Malformed(_))
        );
        assert_matches!(
            row("active", "running").into_player(),
            Err(StoreError::Malformed(_))
        );
    }
}
