//! In-process trigger events.
//!
//! - [`EventBus`] fans [`PlatformEvent`]s out over `tokio::sync::broadcast`.
//! - [`ObservedBlobStore`] and [`ObservedPlayerStore`] wrap the storage
//!   collaborators and publish an event after every successful write, the
//!   way bucket notifications and document triggers would.

pub mod bus;
pub mod observed;

pub use bus::{EventBus, EventKind, PlatformEvent};
pub use observed::{ObservedBlobStore, ObservedPlayerStore};
