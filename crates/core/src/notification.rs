//! Object-created notification payload.

use serde::{Deserialize, Serialize};

/// A blob was written. Mirrors what bucket notifications deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFinalized {
    /// Object path inside the bucket.
    pub path: String,
    /// Declared content type, when the uploader set one.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl ObjectFinalized {
    pub fn new(path: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: Some(content_type.into()),
        }
    }
}
