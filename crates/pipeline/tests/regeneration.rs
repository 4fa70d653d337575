mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use common::{Harness, ScriptedTransformer};
use elfcast_cloud::{BlobOp, MemoryBlobStore};
use elfcast_core::blob::{BlobError, BlobStore, ObjectMetadata};
use elfcast_core::player::{GenerationStatus, Player, PlayerChange};
use elfcast_core::store::PlayerStore;
use elfcast_db::MemoryDocumentStore;
use elfcast_events::{EventBus, ObservedBlobStore, ObservedPlayerStore};
use elfcast_pipeline::regenerate::REGENERATED_AT_METADATA;
use elfcast_pipeline::{
    AvatarPipeline, PlayerService, RegenerationOutcome, RegenerationTrigger, TriggerDispatcher,
};

fn change(player: &Player, before: bool, after: bool) -> PlayerChange {
    let mut b = player.clone();
    b.regenerate_requested = before;
    let mut a = player.clone();
    a.regenerate_requested = after;
    PlayerChange {
        before: b,
        after: a,
    }
}

/// Completed player whose flag has just been raised in the store.
async fn raised(h: &Harness, id: &str, ext: &str) -> Player {
    let mut player = h.seed_player(id, ext).await;
    player.generation_status = GenerationStatus::Completed;
    player.avatar_url = Some(format!("http://files.test/player-avatars/{id}.png"));
    player.regenerate_requested = true;
    h.docs.put_player(player.clone()).await;
    player
}

// ---------------------------------------------------------------------------
// Edge detection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn raised_flag_reuploads_photo_in_place() {
    let h = Harness::new(ScriptedTransformer::succeeding());
    let player = raised(&h, "p1", "png").await;

    let outcome = h
        .regeneration()
        .handle_update(&change(&player, false, true))
        .await;

    assert_eq!(
        outcome,
        RegenerationOutcome::Requeued {
            player_id: "p1".into(),
            photo_path: "player-photos/p1.png".into(),
        }
    );

    let after = h.player("p1").await;
    assert_eq!(after.generation_status, GenerationStatus::Pending);
    assert!(!after.regenerate_requested);

    assert_eq!(
        h.blobs.ops(),
        vec![
            BlobOp::Exists("player-photos/p1.jpg".into()),
            BlobOp::Exists("player-photos/p1.jpeg".into()),
            BlobOp::Exists("player-photos/p1.png".into()),
            BlobOp::Download("player-photos/p1.png".into()),
            BlobOp::Upload("player-photos/p1.png".into()),
        ]
    );
    let photo = h.blobs.object("player-photos/p1.png").await.unwrap();
    assert_eq!(photo.content_type, "image/png");
    assert!(photo.metadata.contains_key(REGENERATED_AT_METADATA));
}

#[tokio::test]
async fn other_transitions_are_skipped_without_side_effects() {
    let h = Harness::new(ScriptedTransformer::succeeding());
    let player = raised(&h, "p1", "jpg").await;
    let trigger = h.regeneration();

    for (before, after) in [(true, true), (false, false), (true, false)] {
        assert_matches!(
            trigger.handle_update(&change(&player, before, after)).await,
            RegenerationOutcome::Skipped { .. }
        );
    }

    assert!(h.blobs.ops().is_empty());
    assert_eq!(h.player("p1").await, player);
}

/// Blob store that records the player's state at its first call.
struct StateProbe {
    inner: MemoryBlobStore,
    docs: Arc<MemoryDocumentStore>,
    seen: tokio::sync::Mutex<Option<Player>>,
}

impl StateProbe {
    async fn snapshot(&self) {
        let mut seen = self.seen.lock().await;
        if seen.is_none() {
            *seen = self.docs.get_player("p1").await.unwrap();
        }
    }
}

#[async_trait]
impl BlobStore for StateProbe {
    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        self.snapshot().await;
        self.inner.download(path).await
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<(), BlobError> {
        self.snapshot().await;
        self.inner.upload(path, bytes, content_type, metadata).await
    }

    async fn exists(&self, path: &str) -> Result<bool, BlobError> {
        self.snapshot().await;
        self.inner.exists(path).await
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        self.snapshot().await;
        self.inner.delete(path).await
    }

    async fn read_url(&self, path: &str) -> Result<String, BlobError> {
        self.inner.read_url(path).await
    }
}

#[tokio::test]
async fn request_is_consumed_before_any_blob_io() {
    let h = Harness::new(ScriptedTransformer::succeeding());
    let player = raised(&h, "p1", "jpg").await;

    let probe = Arc::new(StateProbe {
        inner: MemoryBlobStore::default(),
        docs: h.docs.clone(),
        seen: tokio::sync::Mutex::new(None),
    });
    probe.inner.seed("player-photos/p1.jpg", common::jpeg_photo(), "image/jpeg").await;

    let trigger = RegenerationTrigger::new(h.docs.clone(), probe.clone());
    trigger.handle_update(&change(&player, false, true)).await;

    let seen = probe.seen.lock().await.clone().expect("blob store was used");
    assert_eq!(seen.generation_status, GenerationStatus::Pending);
    assert!(!seen.regenerate_requested);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_photo_marks_failed() {
    let h = Harness::new(ScriptedTransformer::succeeding());
    let mut player = h.seed_record("p1").await;
    player.regenerate_requested = true;
    h.docs.put_player(player.clone()).await;

    let outcome = h
        .regeneration()
        .handle_update(&change(&player, false, true))
        .await;

    assert_matches!(outcome, RegenerationOutcome::Failed { ref error, .. } if error.contains("p1"));
    let after = h.player("p1").await;
    assert_eq!(after.generation_status, GenerationStatus::Failed);
    assert!(!after.regenerate_requested);
    assert!(h
        .blobs
        .ops()
        .iter()
        .all(|op| matches!(op, BlobOp::Exists(_))));
}

#[tokio::test]
async fn vanished_player_fails_before_blob_io() {
    let h = Harness::new(ScriptedTransformer::succeeding());
    let player = raised(&h, "p1", "jpg").await;
    h.docs.delete_player("p1").await.unwrap();

    let outcome = h
        .regeneration()
        .handle_update(&change(&player, false, true))
        .await;

    assert_matches!(outcome, RegenerationOutcome::Failed { .. });
    assert!(h.blobs.ops().is_empty());
}

// ---------------------------------------------------------------------------
// Full in-process chain
// ---------------------------------------------------------------------------

struct Wired {
    h: Harness,
    service: PlayerService,
}

fn wire(transformer: ScriptedTransformer) -> Wired {
    let h = Harness::new(transformer);
    let bus = Arc::new(EventBus::default());

    let players: Arc<dyn PlayerStore> =
        Arc::new(ObservedPlayerStore::new(h.docs.clone(), bus.clone()));
    let blobs: Arc<dyn BlobStore> = Arc::new(ObservedBlobStore::new(h.blobs.clone(), bus.clone()));

    let pipeline = Arc::new(AvatarPipeline::new(
        players.clone(),
        h.docs.clone(),
        blobs.clone(),
        h.transformer.clone(),
    ));
    let regeneration = Arc::new(RegenerationTrigger::new(players.clone(), blobs.clone()));
    let dispatcher = TriggerDispatcher::new(pipeline, regeneration);
    tokio::spawn(dispatcher.run(bus.subscribe()));

    let service = PlayerService::new(players, h.docs.clone(), blobs);
    Wired { h, service }
}

async fn wait_for_status(h: &Harness, id: &str, status: GenerationStatus) -> Player {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let player = h.player(id).await;
            if player.generation_status == status {
                return player;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("status reached in time")
}

#[tokio::test(flavor = "multi_thread")]
async fn callable_request_regenerates_avatar_end_to_end() {
    let w = wire(ScriptedTransformer::succeeding());
    w.h.seed_player("p1", "jpg").await;

    let response = w.service.request_regeneration("p1", None).await;
    assert!(response.success);

    let done = wait_for_status(&w.h, "p1", GenerationStatus::Completed).await;
    assert!(!done.regenerate_requested);
    assert_eq!(w.h.transformer.calls(), 1);
    assert!(w.h.blobs.object("player-avatars/p1.png").await.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn regeneration_without_photo_never_calls_the_model() {
    let w = wire(ScriptedTransformer::succeeding());
    w.h.seed_record("p1").await;

    let response = w.service.request_regeneration("p1", None).await;
    assert!(response.success);

    let failed = wait_for_status(&w.h, "p1", GenerationStatus::Failed).await;
    assert!(!failed.regenerate_requested);
    assert_eq!(w.h.transformer.calls(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn registration_generates_avatar_end_to_end() {
    let w = wire(ScriptedTransformer::succeeding());

    let player = w
        .service
        .register(
            "Ada",
            elfcast_pipeline::PhotoUpload {
                bytes: common::jpeg_photo(),
                content_type: "image/jpeg".into(),
            },
        )
        .await
        .unwrap();

    let done = wait_for_status(&w.h, &player.id, GenerationStatus::Completed).await;
    assert_eq!(
        done.avatar_url,
        Some(format!("http://files.test/player-avatars/{}.png", player.id))
    );
}
