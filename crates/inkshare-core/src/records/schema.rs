//! Serialized store schema sent alongside every snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the schema envelope itself.
pub const SCHEMA_VERSION: u32 = 2;

/// Describes which record migrations a snapshot was written with, so the
/// receiving side can migrate it forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedSchema {
    pub schema_version: u32,
    /// Migration sequence id to the last applied version.
    pub sequences: BTreeMap<String, u32>,
}

impl Default for SerializedSchema {
    fn default() -> Self {
        let sequences = [
            ("com.inkshare.store", 4),
            ("com.inkshare.asset", 1),
            ("com.inkshare.asset.image", 4),
            ("com.inkshare.asset.video", 4),
            ("com.inkshare.asset.bookmark", 2),
            ("com.inkshare.document", 2),
            ("com.inkshare.page", 1),
            ("com.inkshare.shape", 4),
            ("com.inkshare.shape.image", 3),
            ("com.inkshare.shape.video", 2),
            ("com.inkshare.shape.bookmark", 2),
        ]
        .into_iter()
        .map(|(id, version)| (id.to_string(), version))
        .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            sequences,
        }
    }
}
