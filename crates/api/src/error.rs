use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use elfcast_core::blob::BlobError;
use elfcast_core::error::CoreError;
use elfcast_core::store::StoreError;
use elfcast_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent `{ "error", "code" }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core(core),
            AppError::Pipeline(err) => classify_pipeline(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal(detail: &dyn std::fmt::Display) -> Classified {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Image(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "IMAGE_ERROR", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

fn classify_pipeline(err: &PipelineError) -> Classified {
    match err {
        PipelineError::Core(core) => classify_core(core),
        PipelineError::Store(StoreError::PlayerNotFound(id)) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Player with id {id} not found"),
        ),
        PipelineError::Store(StoreError::AlreadyExists(id)) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Player with id {id} already exists"),
        ),
        PipelineError::Blob(BlobError::InvalidPath(path)) => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Invalid object path: {path}"),
        ),
        PipelineError::PhotoMissing(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        other => internal(other),
    }
}
