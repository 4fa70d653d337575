//! Repository for the `players` table.

use elfcast_core::player::{NewPlayer, PlayerUpdate};
use sqlx::PgPool;

use crate::models::player::PlayerRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, original_photo_url, avatar_url, status, generation_status, \
                       regenerate_requested, created_at, updated_at";

/// Provides CRUD operations for players.
pub struct PlayerRepo;

impl PlayerRepo {
    /// Insert a new player, returning the created row.
    ///
    /// Status columns take their table defaults (`active`, `pending`).
    pub async fn create(pool: &PgPool, input: &NewPlayer) -> Result<PlayerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (id, name, original_photo_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.original_photo_url)
            .fetch_one(pool)
            .await
    }

    /// Find a player by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<PlayerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all players, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<PlayerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players ORDER BY created_at DESC");
        sqlx::query_as::<_, PlayerRow>(&query).fetch_all(pool).await
    }

    /// Apply a partial update. Only non-`None` fields in `input` are written.
    ///
    /// Locks the row, reads the previous state and writes the new one in a
    /// single transaction. Returns `None` if no row with `id` exists,
    /// otherwise the `(before, after)` rows.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &PlayerUpdate,
    ) -> Result<Option<(PlayerRow, PlayerRow)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM players WHERE id = $1 FOR UPDATE");
        let Some(before) = sqlx::query_as::<_, PlayerRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let update = format!(
            "UPDATE players SET
                name = COALESCE($2, name),
                original_photo_url = COALESCE($3, original_photo_url),
                avatar_url = CASE WHEN $4 THEN $5 ELSE avatar_url END,
                status = COALESCE($6, status),
                generation_status = COALESCE($7, generation_status),
                regenerate_requested = COALESCE($8, regenerate_requested),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let after = sqlx::query_as::<_, PlayerRow>(&update)
            .bind(id)
            .bind(&input.name)
            .bind(&input.original_photo_url)
            .bind(input.avatar_url.is_some())
            .bind(input.avatar_url.clone().flatten())
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.generation_status.map(|s| s.as_str()))
            .bind(input.regenerate_requested)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((before, after)))
    }

    /// Delete a player. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
