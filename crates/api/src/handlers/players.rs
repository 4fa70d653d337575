//! Handlers for the `/players` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use elfcast_core::player::{Player, PlayerStatus};
use elfcast_pipeline::PhotoUpload;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fields of the player multipart form. Both are optional at this level;
/// registration requires them.
#[derive(Debug, Default)]
struct PlayerForm {
    name: Option<String>,
    photo: Option<PhotoUpload>,
}

async fn read_player_form(mut multipart: Multipart) -> AppResult<PlayerForm> {
    let mut form = PlayerForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.name = Some(text);
            }
            "photo" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.photo = Some(PhotoUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/players
///
/// Multipart form with required `name` and `photo` fields.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Player>>)> {
    let form = read_player_form(multipart).await?;
    let photo = form
        .photo
        .ok_or_else(|| AppError::BadRequest("Missing required 'photo' field".into()))?;
    let name = form.name.unwrap_or_default();

    let player = state.players.register(&name, photo).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: player })))
}

/// GET /api/v1/players
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Player>>>> {
    let players = state.players.list().await?;
    Ok(Json(DataResponse { data: players }))
}

/// GET /api/v1/players/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Player>>> {
    let player = state.players.get(&id).await?;
    Ok(Json(DataResponse { data: player }))
}

/// PUT /api/v1/players/{id}
///
/// Multipart form with optional `name` and `photo` fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Player>>> {
    let form = read_player_form(multipart).await?;
    let player = state
        .players
        .update_details(&id, form.name.as_deref(), form.photo)
        .await?;
    Ok(Json(DataResponse { data: player }))
}

#[derive(Debug, Deserialize)]
pub struct SetStatus {
    pub status: PlayerStatus,
}

/// PUT /api/v1/players/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetStatus>,
) -> AppResult<Json<DataResponse<Player>>> {
    let player = state.players.set_status(&id, input.status).await?;
    Ok(Json(DataResponse { data: player }))
}

/// DELETE /api/v1/players/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.players.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
