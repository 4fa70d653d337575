//! Webhook handlers.
//!
//! Both hooks run their trigger inline and always answer 200 with the
//! structured outcome, so the notifier never retries a handled event.

use axum::extract::State;
use axum::Json;
use elfcast_core::notification::ObjectFinalized;
use elfcast_core::player::PlayerChange;
use elfcast_pipeline::{PipelineOutcome, RegenerationOutcome};

use crate::response::DataResponse;
use crate::state::AppState;

/// POST /hooks/object-finalized
pub async fn object_finalized(
    State(state): State<AppState>,
    Json(notification): Json<ObjectFinalized>,
) -> Json<DataResponse<PipelineOutcome>> {
    let outcome = state.pipeline.handle_upload(&notification).await;
    Json(DataResponse { data: outcome })
}

/// POST /hooks/player-updated
pub async fn player_updated(
    State(state): State<AppState>,
    Json(change): Json<PlayerChange>,
) -> Json<DataResponse<RegenerationOutcome>> {
    let outcome = state.regeneration.handle_update(&change).await;
    Json(DataResponse { data: outcome })
}
