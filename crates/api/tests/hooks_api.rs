//! Webhooks and the callable regeneration endpoint.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, get, register, send_json, FILES_URL};
use elfcast_core::store::PlayerStore;
use serde_json::json;

#[tokio::test]
async fn object_finalized_hook_generates_avatar() {
    let app = build_test_app();
    let player = register(&app, "Ada").await;
    let id = player["id"].as_str().unwrap();

    let response = send_json(
        &app,
        Method::POST,
        "/hooks/object-finalized",
        json!({ "path": format!("player-photos/{id}.jpg"), "contentType": "image/jpeg" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let avatar_url = format!("{FILES_URL}/player-avatars/{id}.png");
    assert_eq!(json["data"]["result"], "completed");
    assert_eq!(json["data"]["avatarUrl"], avatar_url);

    let stored = body_json(get(&app, &format!("/api/v1/players/{id}")).await).await;
    assert_eq!(stored["data"]["generationStatus"], "completed");
    assert_eq!(stored["data"]["avatarUrl"], avatar_url);
}

#[tokio::test]
async fn object_finalized_hook_skips_avatars() {
    let app = build_test_app();
    let response = send_json(
        &app,
        Method::POST,
        "/hooks/object-finalized",
        json!({ "path": "player-avatars/p1.png", "contentType": "image/png" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["result"], "skipped");
}

#[tokio::test]
async fn failed_generation_still_answers_200() {
    let app = build_test_app();
    let response = send_json(
        &app,
        Method::POST,
        "/hooks/object-finalized",
        json!({ "path": "player-photos/ghost.jpg", "contentType": "image/jpeg" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["result"], "failed");
    assert_eq!(json["data"]["playerId"], "ghost");
}

#[tokio::test]
async fn player_updated_hook_requeues_photo() {
    let app = build_test_app();
    let player = register(&app, "Ada").await;
    let id = player["id"].as_str().unwrap().to_string();

    let mut before = player.clone();
    before["regenerateRequested"] = json!(false);
    let mut after = player.clone();
    after["regenerateRequested"] = json!(true);

    let response = send_json(
        &app,
        Method::POST,
        "/hooks/player-updated",
        json!({ "before": before, "after": after }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["result"], "requeued");
    assert_eq!(json["data"]["photoPath"], format!("player-photos/{id}.jpg"));

    let photo = app
        .blobs
        .object(&format!("player-photos/{id}.jpg"))
        .await
        .unwrap();
    assert!(photo.metadata.contains_key("regeneratedAt"));
}

#[tokio::test]
async fn player_updated_hook_ignores_other_changes() {
    let app = build_test_app();
    let player = register(&app, "Ada").await;

    let response = send_json(
        &app,
        Method::POST,
        "/hooks/player-updated",
        json!({ "before": player, "after": player }),
    )
    .await;

    assert_eq!(body_json(response).await["data"]["result"], "skipped");
}

#[tokio::test]
async fn callable_regeneration_raises_flag() {
    let app = build_test_app();
    let player = register(&app, "Ada").await;
    let id = player["id"].as_str().unwrap();

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/regenerate-avatar",
        json!({ "playerId": id, "originalPhotoUrl": player["originalPhotoUrl"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    let stored = app.docs.get_player(id).await.unwrap().unwrap();
    assert!(stored.regenerate_requested);
}

#[tokio::test]
async fn callable_regeneration_reports_unknown_player() {
    let app = build_test_app();
    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/regenerate-avatar",
        json!({ "playerId": "ghost" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("ghost"));
}
