//! Avatar generation and the player operations around it.
//!
//! - [`AvatarPipeline`] turns an uploaded source photo into a stored avatar
//!   and records the outcome on the player.
//! - [`RegenerationTrigger`] consumes a player's regeneration request by
//!   re-uploading the source photo, which re-fires the pipeline.
//! - [`TriggerDispatcher`] routes in-process storage events to both.
//! - [`PlayerService`] covers registration, edits, deletion and settings.

pub mod avatar;
pub mod dispatcher;
pub mod error;
pub mod players;
pub mod regenerate;

pub use avatar::{AvatarPipeline, PipelineOutcome};
pub use dispatcher::TriggerDispatcher;
pub use error::PipelineError;
pub use players::{PhotoUpload, PlayerService, RegenerationResponse};
pub use regenerate::{RegenerationOutcome, RegenerationTrigger};
