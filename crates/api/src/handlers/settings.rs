use axum::extract::State;
use axum::Json;
use elfcast_core::settings::AvatarSettings;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdatePrompt {
    pub prompt: String,
}

/// GET /api/v1/settings/avatar
pub async fn get_avatar_settings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AvatarSettings>>> {
    let settings = state.players.get_settings().await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings/avatar/prompt
pub async fn update_prompt(
    State(state): State<AppState>,
    Json(input): Json<UpdatePrompt>,
) -> AppResult<Json<DataResponse<AvatarSettings>>> {
    let settings = state.players.update_prompt(&input.prompt).await?;
    Ok(Json(DataResponse { data: settings }))
}
