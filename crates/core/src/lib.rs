//! Domain core for the player avatar service.
//!
//! Holds the player and settings models, storage path conventions, the
//! retry combinator, avatar image normalization, upload validation, and
//! the collaborator traits ([`store`], [`blob`], [`transform`]) that the
//! pipeline is written against.

pub mod blob;
pub mod error;
pub mod imaging;
pub mod notification;
pub mod paths;
pub mod player;
pub mod retry;
pub mod settings;
pub mod store;
pub mod transform;
pub mod types;
pub mod validation;
