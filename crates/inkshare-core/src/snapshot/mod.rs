//! Shareable snapshot extraction.
//!
//! A store dump carries every record the editor knows about, including a
//! cache of assets that were once added and are no longer on the canvas.
//! [`extract_snapshot`] keeps every non-asset record, keeps only the assets a
//! shape still points at (made durable through an [`AssetResolver`]), and
//! measures the result against a [`SizeGate`].

mod size_gate;

pub use size_gate::{MAX_SNAPSHOT_BYTES, SizeGate};

use crate::records::{AssetId, AssetRecord, Record, RecordId, StoreDump};
use crate::resolver::{AssetResolver, ResolveError};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// The shareable record set, keyed by record id.
pub type Snapshot = BTreeMap<RecordId, Record>;

/// Result of a successful extraction run.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The snapshot fits under the ceiling and may be transmitted.
    Accepted(Snapshot),
    /// The snapshot is too large. Carries the measured size in bytes.
    Rejected { size: usize },
}

impl Extraction {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Extraction::Accepted(_))
    }

    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            Extraction::Accepted(snapshot) => Some(snapshot),
            Extraction::Rejected { .. } => None,
        }
    }
}

/// Extraction errors. Oversize is not one of them.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Resolver returned asset {got} for {expected}")]
    IdMismatch { expected: AssetId, got: AssetId },
}

/// Build a shareable snapshot from a store dump.
///
/// Each referenced asset is resolved at most once, in shape order; a reference
/// to an asset that is missing (or already resolved) is skipped and the shape
/// is kept as is. A resolver failure aborts the whole run, as does a resolver
/// that hands back a different asset id.
///
/// Output records are keyed by their own id, whatever key the dump used.
pub async fn extract_snapshot<R>(
    dump: StoreDump,
    resolver: &R,
    gate: &SizeGate,
) -> Result<Extraction, ExtractError>
where
    R: AssetResolver + ?Sized,
{
    let mut snapshot = Snapshot::new();
    let mut assets: HashMap<AssetId, AssetRecord> = HashMap::new();
    let mut references: Vec<AssetId> = Vec::new();

    for (key, record) in dump {
        let id = record.id();
        if key != id {
            log::warn!("Record {} was stored under key {}", id, key);
        }
        match record {
            Record::Asset(asset) => {
                assets.insert(asset.id.clone(), asset);
            }
            Record::Shape(shape) => {
                if let Some(asset_id) = shape.asset_id() {
                    references.push(asset_id);
                }
                snapshot.insert(id, Record::Shape(shape));
            }
            other => {
                snapshot.insert(id, other);
            }
        }
    }

    let mut resolved = 0usize;
    for asset_id in references {
        // Missing means never stored, or a previous shape already took it
        let Some(asset) = assets.remove(&asset_id) else {
            log::trace!("Skipping reference to {}: not in lookup", asset_id);
            continue;
        };
        let durable = resolver.resolve(asset).await?;
        if durable.id != asset_id {
            return Err(ExtractError::IdMismatch {
                expected: asset_id,
                got: durable.id,
            });
        }
        snapshot.insert(durable.id.to_record_id(), Record::Asset(durable));
        resolved += 1;
    }

    if !assets.is_empty() {
        log::debug!("Dropping {} unreferenced assets", assets.len());
    }

    let extraction = gate.check(snapshot)?;
    match &extraction {
        Extraction::Accepted(snapshot) => log::info!(
            "Extracted snapshot with {} records ({} assets resolved)",
            snapshot.len(),
            resolved
        ),
        Extraction::Rejected { size } => log::warn!(
            "Snapshot rejected: {} bytes exceeds limit of {}",
            size,
            gate.max_bytes
        ),
    }
    Ok(extraction)
}
