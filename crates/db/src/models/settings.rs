//! Settings row model.

use elfcast_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `settings` table: one JSON document per key.
#[derive(Debug, Clone, FromRow)]
pub struct SettingsRow {
    pub key: String,
    pub data: serde_json::Value,
    pub updated_at: Timestamp,
}
