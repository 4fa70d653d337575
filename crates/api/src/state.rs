use std::sync::Arc;

use elfcast_pipeline::{AvatarPipeline, PlayerService, RegenerationTrigger};

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Postgres pool, `None` when running on the in-memory store.
    pub pool: Option<elfcast_db::DbPool>,
    pub players: Arc<PlayerService>,
    pub pipeline: Arc<AvatarPipeline>,
    pub regeneration: Arc<RegenerationTrigger>,
}
