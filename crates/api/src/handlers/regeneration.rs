use axum::extract::State;
use axum::Json;
use elfcast_pipeline::RegenerationResponse;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateAvatarRequest {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub original_photo_url: Option<String>,
}

/// POST /api/v1/regenerate-avatar
///
/// Failures are reported in the body (`success: false`), not as HTTP errors.
pub async fn regenerate_avatar(
    State(state): State<AppState>,
    Json(input): Json<RegenerateAvatarRequest>,
) -> Json<RegenerationResponse> {
    let response = state
        .players
        .request_regeneration(&input.player_id, input.original_photo_url.as_deref())
        .await;
    Json(response)
}
