//! Postgres-backed [`PlayerStore`] and [`SettingsStore`].

use async_trait::async_trait;
use elfcast_core::player::{NewPlayer, Player, PlayerChange, PlayerUpdate};
use elfcast_core::settings::SETTINGS_KEY;
use elfcast_core::store::{PlayerStore, SettingsStore, StoreError};

use crate::repositories::{PlayerRepo, SettingsRepo};
use crate::DbPool;

/// Document store over the `players` and `settings` tables.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx error onto the store taxonomy.
///
/// Unique violations (SQLSTATE 23505) on insert become
/// [`StoreError::AlreadyExists`].
fn store_error(err: sqlx::Error, id: Option<&str>) -> StoreError {
    if let (sqlx::Error::Database(db_err), Some(id)) = (&err, id) {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::AlreadyExists(id.to_string());
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl PlayerStore for PgDocumentStore {
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError> {
        PlayerRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error(e, None))?
            .map(|row| row.into_player())
            .transpose()
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        PlayerRepo::list(&self.pool)
            .await
            .map_err(|e| store_error(e, None))?
            .into_iter()
            .map(|row| row.into_player())
            .collect()
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<Player, StoreError> {
        PlayerRepo::create(&self.pool, &player)
            .await
            .map_err(|e| store_error(e, Some(&player.id)))?
            .into_player()
    }

    async fn update_player(
        &self,
        id: &str,
        update: &PlayerUpdate,
    ) -> Result<PlayerChange, StoreError> {
        let (before, after) = PlayerRepo::update(&self.pool, id, update)
            .await
            .map_err(|e| store_error(e, None))?
            .ok_or_else(|| StoreError::PlayerNotFound(id.to_string()))?;

        Ok(PlayerChange {
            before: before.into_player()?,
            after: after.into_player()?,
        })
    }

    async fn delete_player(&self, id: &str) -> Result<bool, StoreError> {
        PlayerRepo::delete(&self.pool, id)
            .await
            .map_err(|e| store_error(e, None))
    }
}

#[async_trait]
impl SettingsStore for PgDocumentStore {
    async fn get_settings(&self) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(SettingsRepo::find(&self.pool, SETTINGS_KEY)
            .await
            .map_err(|e| store_error(e, None))?
            .map(|row| row.data))
    }

    async fn merge_settings(
        &self,
        fields: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError> {
        if !fields.is_object() {
            return Err(StoreError::Malformed(
                "settings fields must be a JSON object".into(),
            ));
        }
        let row = SettingsRepo::merge(&self.pool, SETTINGS_KEY, &fields)
            .await
            .map_err(|e| store_error(e, None))?;
        Ok(row.data)
    }
}
