//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the observed stores
//! (publishers) and the trigger dispatcher (subscriber).

use chrono::{DateTime, Utc};
use elfcast_core::notification::ObjectFinalized;
use elfcast_core::player::PlayerChange;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    /// A blob finished uploading.
    ObjectFinalized(ObjectFinalized),
    /// A player document was updated.
    PlayerUpdated(PlayerChange),
}

/// A storage event with the time it was observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn object_finalized(notification: ObjectFinalized) -> Self {
        Self::new(EventKind::ObjectFinalized(notification))
    }

    pub fn player_updated(change: PlayerChange) -> Self {
        Self::new(EventKind::PlayerUpdated(change))
    }

    /// Dot-separated event name for logging.
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            EventKind::ObjectFinalized(_) => "object.finalized",
            EventKind::PlayerUpdated(_) => "player.updated",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest events are dropped and slow receivers
/// observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped silently when
    /// nobody is listening.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
