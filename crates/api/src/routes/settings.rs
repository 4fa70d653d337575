use axum::routing::{get, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET /avatar            -> get_avatar_settings
/// PUT /avatar/prompt     -> update_prompt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/avatar", get(settings::get_avatar_settings))
        .route("/avatar/prompt", put(settings::update_prompt))
}
