//! Process-local document store.
//!
//! Backs local runs (`DOCUMENT_STORE=memory`) and tests. Updates are applied
//! under a single write lock, so each `update_player` is atomic like its
//! Postgres counterpart.

use std::collections::HashMap;

use async_trait::async_trait;
use elfcast_core::player::{NewPlayer, Player, PlayerChange, PlayerUpdate};
use elfcast_core::store::{PlayerStore, SettingsStore, StoreError};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryDocumentStore {
    players: RwLock<HashMap<String, Player>>,
    settings: RwLock<Option<serde_json::Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given settings record.
    pub fn with_settings(settings: serde_json::Value) -> Self {
        Self {
            players: RwLock::default(),
            settings: RwLock::new(Some(settings)),
        }
    }

    /// Insert or replace a full record, bypassing insert semantics.
    pub async fn put_player(&self, player: Player) {
        self.players.write().await.insert(player.id.clone(), player);
    }
}

#[async_trait]
impl PlayerStore for MemoryDocumentStore {
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.players.read().await.get(id).cloned())
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = self.players.read().await.values().cloned().collect();
        players.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(players)
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<Player, StoreError> {
        let mut players = self.players.write().await;
        if players.contains_key(&player.id) {
            return Err(StoreError::AlreadyExists(player.id));
        }
        let record = player.into_player(chrono::Utc::now());
        players.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_player(
        &self,
        id: &str,
        update: &PlayerUpdate,
    ) -> Result<PlayerChange, StoreError> {
        let mut players = self.players.write().await;
        let record = players
            .get_mut(id)
            .ok_or_else(|| StoreError::PlayerNotFound(id.to_string()))?;
        let before = record.clone();
        update.apply(record);
        Ok(PlayerChange {
            before,
            after: record.clone(),
        })
    }

    async fn delete_player(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.players.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl SettingsStore for MemoryDocumentStore {
    async fn get_settings(&self) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.settings.read().await.clone())
    }

    async fn merge_settings(
        &self,
        fields: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError> {
        let serde_json::Value::Object(fields) = fields else {
            return Err(StoreError::Malformed(
                "settings fields must be a JSON object".into(),
            ));
        };

        let mut settings = self.settings.write().await;
        let mut merged = match settings.take() {
            Some(serde_json::Value::Object(existing)) => existing,
            _ => serde_json::Map::new(),
        };
        merged.extend(fields);
        let merged = serde_json::Value::Object(merged);
        *settings = Some(merged.clone());
        Ok(merged)
    }
}
