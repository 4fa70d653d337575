//! Document store collaborator: player records and the settings record.
//!
//! Implementations live in `elfcast-db` (Postgres and in-memory). The
//! pipeline only ever talks to these traits.

use async_trait::async_trait;

use crate::player::{NewPlayer, Player, PlayerChange, PlayerUpdate};
use crate::types::PlayerId;

/// Errors raised by a document store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No player record exists under the given ID.
    #[error("Player document not found: {0}")]
    PlayerNotFound(PlayerId),

    /// A record with the same key already exists.
    #[error("Player document already exists: {0}")]
    AlreadyExists(PlayerId),

    /// A stored record could not be mapped onto the domain model.
    #[error("Malformed record: {0}")]
    Malformed(String),

    /// The backend itself failed (connection, query, serialization).
    #[error("Document store error: {0}")]
    Backend(String),
}

/// Player records keyed by [`PlayerId`].
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Fetch a player, `None` when absent.
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError>;

    /// List all players, newest first.
    async fn list_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Insert a new player record.
    async fn insert_player(&self, player: NewPlayer) -> Result<Player, StoreError>;

    /// Apply a partial update and return the before/after snapshots.
    ///
    /// Fails with [`StoreError::PlayerNotFound`] when the record is absent.
    async fn update_player(&self, id: &str, update: &PlayerUpdate)
        -> Result<PlayerChange, StoreError>;

    /// Delete a player record, returning whether one existed.
    async fn delete_player(&self, id: &str) -> Result<bool, StoreError>;
}

/// The singleton settings record, held as a raw JSON document.
///
/// Callers resolve fields through [`crate::settings`], which tolerates
/// missing records and fields.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the raw settings record, `None` when it has never been written.
    async fn get_settings(&self) -> Result<Option<serde_json::Value>, StoreError>;

    /// Shallow-merge `fields` into the record, creating it from `fields`
    /// when absent. Returns the merged record.
    async fn merge_settings(
        &self,
        fields: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError>;
}
