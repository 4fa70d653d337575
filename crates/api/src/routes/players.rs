use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;

use crate::handlers::players;
use crate::state::AppState;

/// Request body cap for photo uploads: the 5 MiB photo plus form overhead.
pub const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

/// Routes mounted at `/players`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> register (multipart: name, photo)
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update (multipart: name?, photo?)
/// DELETE /{id}             -> delete
/// PUT    /{id}/status      -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(players::list).post(players::register))
        .route(
            "/{id}",
            get(players::get_by_id)
                .put(players::update)
                .delete(players::delete),
        )
        .route("/{id}/status", put(players::set_status))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
