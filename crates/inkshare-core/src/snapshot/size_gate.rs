//! Size ceiling for shareable snapshots.

use super::{Extraction, Snapshot};
use serde::{Deserialize, Serialize};

/// Largest serialized snapshot the persistence service accepts, in bytes.
pub const MAX_SNAPSHOT_BYTES: usize = 3_999_999;

/// Accepts or rejects a finished snapshot by its canonical JSON size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeGate {
    pub max_bytes: usize,
}

impl Default for SizeGate {
    fn default() -> Self {
        Self {
            max_bytes: MAX_SNAPSHOT_BYTES,
        }
    }
}

impl SizeGate {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Serialized size of a snapshot in bytes.
    pub fn measure(snapshot: &Snapshot) -> Result<usize, serde_json::Error> {
        serde_json::to_vec(snapshot).map(|bytes| bytes.len())
    }

    /// Measure the snapshot once and decide. Sizes equal to the ceiling pass.
    pub fn check(&self, snapshot: Snapshot) -> Result<Extraction, serde_json::Error> {
        let size = Self::measure(&snapshot)?;
        if size > self.max_bytes {
            Ok(Extraction::Rejected { size })
        } else {
            Ok(Extraction::Accepted(snapshot))
        }
    }
}
