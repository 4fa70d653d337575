//! Notification webhooks for external storage infrastructure.

use axum::routing::post;
use axum::Router;

use crate::handlers::hooks;
use crate::state::AppState;

/// Routes mounted at `/hooks`.
///
/// ```text
/// POST /object-finalized     upload notification  -> avatar pipeline
/// POST /player-updated       update notification  -> regeneration trigger
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/object-finalized", post(hooks::object_finalized))
        .route("/player-updated", post(hooks::player_updated))
}
