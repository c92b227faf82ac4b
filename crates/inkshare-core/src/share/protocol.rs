//! Request and response bodies exchanged with the persistence service.

use crate::records::SerializedSchema;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/new-room`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomRequest {
    pub schema: SerializedSchema,
    pub snapshot: Snapshot,
}

/// Reply to `POST /api/new-room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoomResponse {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewRoomResponse {
    pub fn created(slug: impl Into<String>) -> Self {
        Self {
            error: false,
            slug: Some(slug.into()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: true,
            slug: None,
            message: Some(message.into()),
        }
    }
}

/// Body of `POST /api/snapshots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSnapshotRequest {
    pub schema: SerializedSchema,
    pub snapshot: Snapshot,
    /// Room the snapshot was taken from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_slug: Option<String>,
}

/// Reply to `POST /api/snapshots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotResponse {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CreateSnapshotResponse {
    pub fn created(room_id: impl Into<String>) -> Self {
        Self {
            error: false,
            room_id: Some(room_id.into()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: true,
            room_id: None,
            message: Some(message.into()),
        }
    }
}

/// Reply to `PUT /uploads/{object}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Generic error body returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}
