//! Input validation for player registration and settings edits.

use crate::error::CoreError;
use crate::paths::extension_for_content_type;

/// Largest accepted source photo (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Longest accepted player name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Accepted source photo content types.
pub const ACCEPTED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Validate a player name, returning it trimmed.
pub fn validate_player_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Player name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(CoreError::Validation(format!(
            "Player name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an uploaded photo and return the extension it is stored under.
pub fn validate_photo(content_type: &str, size_bytes: usize) -> Result<&'static str, CoreError> {
    if !ACCEPTED_PHOTO_TYPES.contains(&content_type) {
        return Err(CoreError::Validation(
            "Please select a JPEG, PNG, or WebP image".into(),
        ));
    }
    if size_bytes == 0 {
        return Err(CoreError::Validation("Image file is empty".into()));
    }
    if size_bytes > MAX_PHOTO_BYTES {
        return Err(CoreError::Validation("Image size must be less than 5MB".into()));
    }
    extension_for_content_type(content_type).ok_or_else(|| {
        CoreError::Internal(format!("No extension mapped for '{content_type}'"))
    })
}

/// Validate a new avatar prompt, returning it trimmed.
pub fn validate_prompt(prompt: &str) -> Result<String, CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Avatar prompt must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
