//! Share client configuration.

use super::ShareError;
use crate::snapshot::{MAX_SNAPSHOT_BYTES, SizeGate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where shared links point and which endpoints receive payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Public origin used to build room and snapshot links.
    pub origin: String,
    pub new_room_path: String,
    pub snapshot_path: String,
    pub max_snapshot_bytes: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3030".to_string(),
            new_room_path: "/api/new-room".to_string(),
            snapshot_path: "/api/snapshots".to_string(),
            max_snapshot_bytes: MAX_SNAPSHOT_BYTES,
        }
    }
}

impl ShareConfig {
    /// Load configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ShareError> {
        let json = fs::read_to_string(path).map_err(|e| {
            ShareError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
            .map_err(|e| ShareError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn size_gate(&self) -> SizeGate {
        SizeGate::new(self.max_snapshot_bytes)
    }

    /// Absolute link for an app path such as `/r/{slug}`.
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), path)
    }
}
