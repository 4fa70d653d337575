//! Repository for the `settings` table.

use sqlx::PgPool;

use crate::models::settings::SettingsRow;

const COLUMNS: &str = "key, data, updated_at";

/// Reads and merges keyed JSON settings documents.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Find the settings document stored under `key`.
    pub async fn find(pool: &PgPool, key: &str) -> Result<Option<SettingsRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE key = $1");
        sqlx::query_as::<_, SettingsRow>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Shallow-merge `fields` into the document under `key`, inserting it
    /// when absent.
    pub async fn merge(
        pool: &PgPool,
        key: &str,
        fields: &serde_json::Value,
    ) -> Result<SettingsRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO settings (key, data)
             VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE
                SET data = settings.data || EXCLUDED.data,
                    updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SettingsRow>(&query)
            .bind(key)
            .bind(fields)
            .fetch_one(pool)
            .await
    }
}
