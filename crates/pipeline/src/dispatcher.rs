//! Routes in-process storage events to the triggers.

use std::sync::Arc;

use elfcast_events::{EventKind, PlatformEvent};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::avatar::AvatarPipeline;
use crate::regenerate::RegenerationTrigger;

/// Spawns one task per storage event.
///
/// Invocations are independent: a slow or failing one never delays the
/// next event.
#[derive(Clone)]
pub struct TriggerDispatcher {
    pipeline: Arc<AvatarPipeline>,
    regeneration: Arc<RegenerationTrigger>,
}

impl TriggerDispatcher {
    pub fn new(pipeline: Arc<AvatarPipeline>, regeneration: Arc<RegenerationTrigger>) -> Self {
        Self {
            pipeline,
            regeneration,
        }
    }

    /// Run the dispatch loop until the event bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.dispatch(event);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Trigger dispatcher lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, trigger dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Start handling one event on its own task.
    pub fn dispatch(&self, event: PlatformEvent) -> JoinHandle<()> {
        tracing::debug!(event_type = event.event_type(), "Dispatching storage event");
        let pipeline = Arc::clone(&self.pipeline);
        let regeneration = Arc::clone(&self.regeneration);

        tokio::spawn(async move {
            match event.kind {
                EventKind::ObjectFinalized(notification) => {
                    pipeline.handle_upload(&notification).await;
                }
                EventKind::PlayerUpdated(change) => {
                    regeneration.handle_update(&change).await;
                }
            }
        })
    }
}
