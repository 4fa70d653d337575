//! Storage wrappers that publish change events.
//!
//! Events are published only after the wrapped write succeeded, so a
//! subscriber always sees state that is already durable.

use std::sync::Arc;

use async_trait::async_trait;
use elfcast_core::blob::{BlobError, BlobStore, ObjectMetadata};
use elfcast_core::notification::ObjectFinalized;
use elfcast_core::player::{NewPlayer, Player, PlayerChange, PlayerUpdate};
use elfcast_core::store::{PlayerStore, StoreError};

use crate::bus::{EventBus, PlatformEvent};

// ---------------------------------------------------------------------------
// Blobs
// ---------------------------------------------------------------------------

/// Publishes [`ObjectFinalized`] after each successful upload.
pub struct ObservedBlobStore {
    inner: Arc<dyn BlobStore>,
    bus: Arc<EventBus>,
}

impl ObservedBlobStore {
    pub fn new(inner: Arc<dyn BlobStore>, bus: Arc<EventBus>) -> Self {
        Self { inner, bus }
    }
}

#[async_trait]
impl BlobStore for ObservedBlobStore {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        self.inner.download(path).await
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), BlobError> {
        self.inner.upload(path, bytes, content_type, metadata).await?;
        tracing::debug!(path, content_type, "Publishing object finalized");
        self.bus
            .publish(PlatformEvent::object_finalized(ObjectFinalized::new(
                path,
                content_type,
            )));
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        self.inner.exists(path).await
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.inner.delete(path).await
    }

    async fn read_url(&self, path: &str) -> Result<String, BlobError> {
        self.inner.read_url(path).await
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Publishes a [`PlayerChange`] after each successful update.
///
/// Inserts and deletes are not published; only updates carry the
/// before/after pair the regeneration trigger inspects.
pub struct ObservedPlayerStore {
    inner: Arc<dyn PlayerStore>,
    bus: Arc<EventBus>,
}

impl ObservedPlayerStore {
    pub fn new(inner: Arc<dyn PlayerStore>, bus: Arc<EventBus>) -> Self {
        Self { inner, bus }
    }
}

#[async_trait]
impl PlayerStore for ObservedPlayerStore {
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError> {
        self.inner.get_player(id).await
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.inner.list_players().await
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<Player, StoreError> {
        self.inner.insert_player(player).await
    }

    async fn update_player(
        &self,
        id: &str,
        update: &PlayerUpdate,
    ) -> Result<PlayerChange, StoreError> {
        let change = self.inner.update_player(id, update).await?;
        self.bus.publish(PlatformEvent::player_updated(change.clone()));
        Ok(change)
    }

    async fn delete_player(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.delete_player(id).await
    }
}
