//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod player_repo;
pub mod settings_repo;

pub use player_repo::PlayerRepo;
pub use settings_repo::SettingsRepo;
