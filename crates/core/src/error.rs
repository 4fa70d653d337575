use crate::types::PlayerId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: PlayerId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Image processing failed: {0}")]
    Image(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
