use elfcast_core::blob::BlobError;
use elfcast_core::error::CoreError;
use elfcast_core::retry::RetryError;
use elfcast_core::store::StoreError;
use elfcast_core::transform::TransformError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("Image transform {0}")]
    Transform(#[from] RetryError<TransformError>),

    #[error("No original photo found for player {0}")]
    PhotoMissing(String),
}
