//! End-to-end share flow against the real router, driven in-process.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use inkshare_core::share::protocol::{ErrorResponse, NewRoomRequest};
use inkshare_core::{
    AssetId, AssetKind, AssetRecord, BlobStore, LogPresentation, MemoryBlobStore, OtherRecord,
    Record, RecordId, RecordStore, SerializedSchema, ShapeRecord, ShareAction, ShareAssetResolver,
    ShareConfig, ShareOutcome, ShareService, Snapshot, ViewportQuery,
};
use inkshare_server::{AppState, InProcessClient, ServerConfig, StoredDocument, create_router};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

/// PNG signature, enough for type sniffing.
const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

struct Harness {
    state: Arc<AppState>,
    blobs: Arc<MemoryBlobStore>,
    router: Router,
}

fn harness(config: ServerConfig) -> Harness {
    let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3030/uploads"));
    let state = Arc::new(AppState::new(blobs.clone()));
    let router = create_router(state.clone(), &config);
    Harness {
        state,
        blobs,
        router,
    }
}

type Service = ShareService<InProcessClient, ShareAssetResolver<InProcessClient>, LogPresentation>;

fn share_service(router: &Router) -> Service {
    let client = Arc::new(InProcessClient::new(router.clone()));
    let resolver = Arc::new(ShareAssetResolver::new(client.clone()));
    let config = ShareConfig {
        origin: "https://ink.test".to_string(),
        ..ShareConfig::default()
    };
    ShareService::new(config, client, resolver, Arc::new(LogPresentation))
}

/// A page with one pasted image, plus an asset left behind by a deleted shape.
fn document() -> RecordStore {
    let image = AssetId::parse("asset:pasted").unwrap();
    let mut store = RecordStore::new();
    store.put(OtherRecord::new("page", "page:1").with_field("name", json!("Page 1")));
    store.put(ShapeRecord::new("shape:img", "image").with_asset(&image));
    store.put(
        AssetRecord::new(image, AssetKind::Image)
            .with_prop("name", json!("cat.png"))
            .with_src(PNG_DATA_URL),
    );
    store.put(
        AssetRecord::new(AssetId::parse("asset:deleted").unwrap(), AssetKind::Image)
            .with_src(PNG_DATA_URL),
    );
    store
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn post_json(router: &Router, uri: &str, body: Vec<u8>) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_share_project_creates_room_with_hosted_assets() {
    let h = harness(ServerConfig::default());
    let service = share_service(&h.router);
    let viewport = ViewportQuery::new().with("v", "0.0.1.1");

    let outcome = service
        .share(&document(), &ShareAction::ShareProject, "menu", &viewport)
        .await
        .unwrap();

    let ShareOutcome::Room { slug, url } = outcome else {
        panic!("expected a room, got {:?}", outcome);
    };
    assert_eq!(url, format!("https://ink.test/r/{}?v=0.0.1.1", slug));

    // Only the referenced asset was uploaded.
    assert_eq!(h.blobs.len(), 1);

    let room = h.state.room(&slug).unwrap();
    assert_eq!(room.snapshot.len(), 3);
    assert!(!room.snapshot.contains_key(&RecordId::from("asset:deleted")));

    let Some(Record::Asset(asset)) = room.snapshot.get(&RecordId::from("asset:pasted")) else {
        panic!("asset missing from room");
    };
    let src = asset.src().unwrap().to_string();
    assert!(src.starts_with("http://localhost:3030/uploads/"));
    assert!(src.ends_with("-cat.png"));
    assert_eq!(asset.mime_type(), Some("image/png"));

    // The room is readable over HTTP.
    let response = get(&h.router, &format!("/api/rooms/{}", slug)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: StoredDocument = read_json(response).await;
    assert_eq!(fetched.snapshot, room.snapshot);

    // And the upload is served with its media type.
    let object = src.rsplit('/').next().unwrap();
    let response = get(&h.router, &format!("/uploads/{}", object)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_snapshot_link_keeps_parent_slug() {
    let h = harness(ServerConfig::default());
    let service = share_service(&h.router);
    let action = ShareAction::CreateSnapshotLink {
        parent_slug: Some("parent-room".to_string()),
    };

    let outcome = service
        .share(&document(), &action, "share-menu", &ViewportQuery::new())
        .await
        .unwrap();

    let ShareOutcome::SnapshotLink { room_id, url } = outcome else {
        panic!("expected a snapshot link, got {:?}", outcome);
    };
    assert_eq!(url, format!("https://ink.test/s/{}", room_id));
    assert_eq!(h.state.snapshot_count(), 1);
    assert_eq!(h.state.room_count(), 0);

    let stored = h.state.snapshot(&room_id).unwrap();
    assert_eq!(stored.parent_slug.as_deref(), Some("parent-room"));
}

#[tokio::test]
async fn test_too_large_snapshot_is_never_sent() {
    let h = harness(ServerConfig::default());
    let client = Arc::new(InProcessClient::new(h.router.clone()));
    let resolver = Arc::new(ShareAssetResolver::new(client.clone()));
    let config = ShareConfig {
        max_snapshot_bytes: 10,
        ..ShareConfig::default()
    };
    let service = ShareService::new(config, client, resolver, Arc::new(LogPresentation));

    let outcome = service
        .share(&document(), &ShareAction::ShareProject, "menu", &ViewportQuery::new())
        .await
        .unwrap();

    assert!(matches!(outcome, ShareOutcome::TooLarge { size } if size > 10));
    assert_eq!(h.state.room_count(), 0);
}

#[tokio::test]
async fn test_oversize_body_is_rejected() {
    let config = ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    };
    let h = harness(config);

    let mut snapshot = Snapshot::new();
    let page = OtherRecord::new("page", "page:1").with_field("name", json!("x".repeat(256)));
    snapshot.insert(RecordId::from("page:1"), Record::from(page));
    let body = serde_json::to_vec(&NewRoomRequest {
        schema: SerializedSchema::default(),
        snapshot,
    })
    .unwrap();

    let response = post_json(&h.router, "/api/new-room", body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error: ErrorResponse = read_json(response).await;
    assert!(error.error);
    assert_eq!(h.state.room_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let h = harness(ServerConfig::default());

    let response = post_json(&h.router, "/api/snapshots", b"{not json".to_vec()).await;
    assert!(response.status().is_client_error());
    let error: ErrorResponse = read_json(response).await;
    assert!(error.error);
    assert!(!error.message.is_empty());
}

#[tokio::test]
async fn test_record_under_wrong_key_is_rejected() {
    let h = harness(ServerConfig::default());

    let mut snapshot = Snapshot::new();
    snapshot.insert(
        RecordId::from("shape:a"),
        Record::from(ShapeRecord::new("shape:b", "geo")),
    );
    let body = serde_json::to_vec(&NewRoomRequest {
        schema: SerializedSchema::default(),
        snapshot,
    })
    .unwrap();

    let response = post_json(&h.router, "/api/new-room", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.state.room_count(), 0);
}

#[tokio::test]
async fn test_unknown_room_and_upload_are_not_found() {
    let h = harness(ServerConfig::default());

    assert_eq!(get(&h.router, "/api/rooms/nope").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&h.router, "/api/snapshots/nope").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&h.router, "/uploads/nope.png").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_blob_store_round_trip() {
    let h = harness(ServerConfig::default());
    let client = InProcessClient::new(h.router.clone());

    let url = client.put("clip.mp4", vec![1, 2, 3]).await.unwrap();
    assert_eq!(url, "http://localhost:3030/uploads/clip.mp4");
    assert!(client.exists("clip.mp4").await.unwrap());
    assert_eq!(client.get("clip.mp4").await.unwrap(), vec![1, 2, 3]);
    assert!(!client.exists("other.mp4").await.unwrap());

    // A name that sanitizes to nothing never reaches the server.
    assert!(client.put("..", vec![1]).await.is_err());
    assert_eq!(h.blobs.len(), 1);
}

#[tokio::test]
async fn test_health() {
    let h = harness(ServerConfig::default());

    let response = get(&h.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), b"ok");
}
