//! HTTP routes of the persistence service.

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Path, State,
        rejection::{BytesRejection, JsonRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use bytes::Bytes;
use inkshare_core::share::protocol::{
    CreateSnapshotRequest, CreateSnapshotResponse, ErrorResponse, NewRoomRequest,
    NewRoomResponse, UploadResponse,
};
use inkshare_core::{BlobError, MediaType, Snapshot};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::state::{AppState, StoredDocument};

/// Error reply: a status code and a JSON `{ error: true, message }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", what))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<BlobError> for ApiError {
    fn from(e: BlobError) -> Self {
        let status = match e {
            BlobError::NotFound(_) => StatusCode::NOT_FOUND,
            BlobError::InvalidName(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

/// Build the service router.
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/api/new-room", post(new_room))
        .route("/api/snapshots", post(create_snapshot))
        .route("/api/snapshots/{id}", get(get_snapshot))
        .route("/api/rooms/{slug}", get(get_room))
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    let uploads = Router::new()
        .route("/uploads/{object}", put(put_upload).get(get_upload))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(api)
        .merge(uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "InkShare persistence service"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Every record must be stored under its own id.
fn validate_snapshot(snapshot: &Snapshot) -> Result<(), ApiError> {
    for (key, record) in snapshot {
        if *key != record.id() {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("Record {} stored under key {}", record.id(), key),
            ));
        }
    }
    Ok(())
}

async fn new_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewRoomRequest>, JsonRejection>,
) -> Result<Json<NewRoomResponse>, ApiError> {
    let Json(request) = payload.inspect_err(|e| warn!("Rejected room: {}", e))?;
    validate_snapshot(&request.snapshot)?;

    let records = request.snapshot.len();
    let slug = state.create_room(StoredDocument::new(request.schema, request.snapshot, None));
    info!("Created room {} with {} records", slug, records);
    Ok(Json(NewRoomResponse::created(slug)))
}

async fn create_snapshot(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSnapshotRequest>, JsonRejection>,
) -> Result<Json<CreateSnapshotResponse>, ApiError> {
    let Json(request) = payload.inspect_err(|e| warn!("Rejected snapshot: {}", e))?;
    validate_snapshot(&request.snapshot)?;

    let records = request.snapshot.len();
    let parent = request.parent_slug.clone();
    let id = state.create_snapshot(StoredDocument::new(
        request.schema,
        request.snapshot,
        request.parent_slug,
    ));
    info!(
        "Created snapshot {} with {} records (parent: {:?})",
        id, records, parent
    );
    Ok(Json(CreateSnapshotResponse::created(id)))
}

async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredDocument>, ApiError> {
    state
        .snapshot(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Snapshot"))
}

async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<StoredDocument>, ApiError> {
    state
        .room(&slug)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Room"))
}

async fn put_upload(
    State(state): State<Arc<AppState>>,
    Path(object): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let body = body?;
    let size = body.len();
    let url = state.blobs().put(&object, body.to_vec()).await?;
    info!("Stored upload {} ({} bytes)", object, size);
    Ok(Json(UploadResponse { url }))
}

async fn get_upload(
    State(state): State<Arc<AppState>>,
    Path(object): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.blobs().get(&object).await?;
    let media = MediaType::from_file_name(&object).unwrap_or(MediaType::Binary);
    Ok(([(header::CONTENT_TYPE, media.mime_type())], bytes).into_response())
}
