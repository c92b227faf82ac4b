//! Shared application state.

use dashmap::DashMap;
use inkshare_core::{BlobStore, SerializedSchema, Snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A persisted room or snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub schema: SerializedSchema,
    pub snapshot: Snapshot,
    /// Room a snapshot was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_slug: Option<String>,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

impl StoredDocument {
    pub fn new(schema: SerializedSchema, snapshot: Snapshot, parent_slug: Option<String>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            schema,
            snapshot,
            parent_slug,
            created_at,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Rooms created by sharing a project
    rooms: DashMap<String, StoredDocument>,
    /// Read-only snapshots
    snapshots: DashMap<String, StoredDocument>,
    /// Hosted asset payloads
    blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            rooms: DashMap::new(),
            snapshots: DashMap::new(),
            blobs,
        }
    }

    /// Store a new room and return its slug.
    pub fn create_room(&self, document: StoredDocument) -> String {
        let slug = new_id();
        self.rooms.insert(slug.clone(), document);
        slug
    }

    /// Store a new snapshot and return its id.
    pub fn create_snapshot(&self, document: StoredDocument) -> String {
        let id = new_id();
        self.snapshots.insert(id.clone(), document);
        id
    }

    pub fn room(&self, slug: &str) -> Option<StoredDocument> {
        self.rooms.get(slug).map(|room| room.clone())
    }

    pub fn snapshot(&self, id: &str) -> Option<StoredDocument> {
        self.snapshots.get(id).map(|snapshot| snapshot.clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
