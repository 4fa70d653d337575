//! Avatar-generation settings and the versioned reader for the raw record.
//!
//! The settings record is a loosely-shaped JSON document. The prompt has
//! lived under two field names over time, so reads try the current name,
//! then the legacy one, then a built-in default. A missing record or a
//! failed read is never fatal: every field has a default.

use serde::{Deserialize, Serialize};

/// Document key of the singleton settings record.
pub const SETTINGS_KEY: &str = "avatarGeneration";

/// Current field name of the avatar prompt.
pub const PROMPT_FIELD: &str = "avatarPrompt";

/// Field name used by earlier schema versions.
pub const LEGACY_PROMPT_FIELD: &str = "geminiAvatarPrompt";

/// Field holding the fallback avatar URL.
pub const PLACEHOLDER_FIELD: &str = "placeholderAvatarUrl";

/// Field holding the generation on/off switch.
pub const ENABLED_FIELD: &str = "enabled";

/// Prompt used when the settings record has none.
pub const DEFAULT_AVATAR_PROMPT: &str = "Transform this photo into a cartoon elf character with holiday theme, maintaining facial features and expression";

/// Avatar assigned when generation fails and no placeholder is configured.
pub const DEFAULT_PLACEHOLDER_AVATAR_URL: &str = "https://via.placeholder.com/512";

/// Normalized view of the settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSettings {
    pub avatar_prompt: String,
    pub placeholder_avatar_url: String,
    pub enabled: bool,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            avatar_prompt: DEFAULT_AVATAR_PROMPT.to_string(),
            placeholder_avatar_url: DEFAULT_PLACEHOLDER_AVATAR_URL.to_string(),
            enabled: true,
        }
    }
}

impl AvatarSettings {
    /// Resolve every field of a raw settings record, `None` meaning absent.
    pub fn from_record(record: Option<&serde_json::Value>) -> Self {
        Self {
            avatar_prompt: resolve_prompt(record),
            placeholder_avatar_url: resolve_placeholder(record),
            enabled: resolve_enabled(record),
        }
    }

    /// Serialize into the current record shape.
    pub fn to_record(&self) -> serde_json::Value {
        serde_json::json!({
            PROMPT_FIELD: self.avatar_prompt,
            PLACEHOLDER_FIELD: self.placeholder_avatar_url,
            ENABLED_FIELD: self.enabled,
        })
    }
}

/// First non-blank string among `fields`, in order.
fn first_string<'a>(record: Option<&'a serde_json::Value>, fields: &[&str]) -> Option<&'a str> {
    let obj = record?.as_object()?;
    fields.iter().find_map(|field| match obj.get(*field) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    })
}

/// Prompt text: [`PROMPT_FIELD`], then [`LEGACY_PROMPT_FIELD`], then
/// [`DEFAULT_AVATAR_PROMPT`].
pub fn resolve_prompt(record: Option<&serde_json::Value>) -> String {
    first_string(record, &[PROMPT_FIELD, LEGACY_PROMPT_FIELD])
        .unwrap_or(DEFAULT_AVATAR_PROMPT)
        .to_string()
}

/// Placeholder avatar URL, or [`DEFAULT_PLACEHOLDER_AVATAR_URL`].
pub fn resolve_placeholder(record: Option<&serde_json::Value>) -> String {
    first_string(record, &[PLACEHOLDER_FIELD])
        .unwrap_or(DEFAULT_PLACEHOLDER_AVATAR_URL)
        .to_string()
}

/// Generation switch, `true` unless explicitly set to `false`.
pub fn resolve_enabled(record: Option<&serde_json::Value>) -> bool {
    record
        .and_then(|r| r.get(ENABLED_FIELD))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
