//! Blob storage path conventions.
//!
//! Source photos live at `player-photos/{playerId}.<ext>` and generated
//! avatars at `player-avatars/{playerId}.png`. These layouts are shared with
//! external clients and must not change.

use crate::error::CoreError;
use crate::types::PlayerId;

/// Folder holding uploaded source photos.
pub const PHOTO_PREFIX: &str = "player-photos/";

/// Folder holding generated avatars.
pub const AVATAR_PREFIX: &str = "player-avatars/";

/// Extension of every generated avatar.
pub const AVATAR_EXTENSION: &str = "png";

/// Content type of every generated avatar.
pub const AVATAR_CONTENT_TYPE: &str = "image/png";

/// Photo extensions probed, in order, when locating a player's original photo.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Whether an object-created notification qualifies for avatar generation:
/// the object sits under [`PHOTO_PREFIX`] and declares an `image/*` type.
pub fn is_photo_upload(path: &str, content_type: Option<&str>) -> bool {
    path.starts_with(PHOTO_PREFIX) && content_type.is_some_and(|ct| ct.starts_with("image/"))
}

/// Derive the player ID from an uploaded object's path.
///
/// The ID is the file name up to its first `.`, so
/// `player-photos/p1.jpg` yields `p1`.
pub fn player_id_from_path(path: &str) -> Result<PlayerId, CoreError> {
    let file_name = path.rsplit('/').next().unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    if stem.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Cannot derive a player id from object path '{path}'"
        )));
    }
    Ok(stem.to_string())
}

/// Canonical path of a player's source photo with the given extension.
pub fn photo_path(player_id: &str, extension: &str) -> String {
    format!("{PHOTO_PREFIX}{player_id}.{extension}")
}

/// Every candidate source photo path for a player, in probe order.
pub fn photo_path_candidates(player_id: &str) -> Vec<String> {
    PHOTO_EXTENSIONS
        .iter()
        .map(|ext| photo_path(player_id, ext))
        .collect()
}

/// Canonical path of a player's generated avatar.
pub fn avatar_path(player_id: &str) -> String {
    format!("{AVATAR_PREFIX}{player_id}.{AVATAR_EXTENSION}")
}

/// File extension used when storing a photo of the given content type.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Content type implied by an object path's extension, defaulting to JPEG.
pub fn content_type_for_path(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Guess an image MIME type from its leading bytes.
///
/// Recognises PNG and WebP (RIFF) signatures and falls back to JPEG.
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, 0x50, ..] => "image/png",
        [0x52, 0x49, ..] => "image/webp",
        _ => "image/jpeg",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
