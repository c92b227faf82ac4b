//! Record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every asset id.
pub const ASSET_PREFIX: &str = "asset:";

/// Identifier of any record in the store, e.g. `shape:abc` or `page:main`.
///
/// The part before the first `:` names the record type the id belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The record-type scope of this id (`"shape"` for `shape:abc`).
    pub fn scope(&self) -> Option<&str> {
        self.0.split_once(':').map(|(scope, _)| scope)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of an asset record. Always starts with `asset:`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(String);

impl AssetId {
    /// Parse an asset id, returning `None` when the prefix is missing.
    pub fn parse(id: &str) -> Option<Self> {
        if id.len() > ASSET_PREFIX.len() && id.starts_with(ASSET_PREFIX) {
            Some(Self(id.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_record_id(&self) -> RecordId {
        RecordId(self.0.clone())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AssetId> for RecordId {
    fn from(id: AssetId) -> Self {
        RecordId(id.0)
    }
}
