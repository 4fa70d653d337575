pub mod health;
pub mod hooks;
pub mod players;
pub mod settings;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /regenerate-avatar                   callable regeneration (POST)
///
/// /players                             list, register (multipart)
/// /players/{id}                        get, update (multipart), delete
/// /players/{id}/status                 activate / deactivate (PUT)
///
/// /settings/avatar                     resolved settings (GET)
/// /settings/avatar/prompt              replace prompt (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/regenerate-avatar",
            post(handlers::regeneration::regenerate_avatar),
        )
        .nest("/players", players::router())
        .nest("/settings", settings::router())
}
