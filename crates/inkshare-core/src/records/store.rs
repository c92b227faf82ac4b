//! The live record store and its point-in-time dumps.

use super::{Record, RecordId};
use std::collections::{BTreeMap, HashMap};

/// A point-in-time copy of every record in a store, keyed by id.
pub type StoreDump = BTreeMap<RecordId, Record>;

/// Anything that can hand out the current state of a record store.
pub trait StoreSource {
    /// Take a full dump of the current records.
    fn dump(&self) -> StoreDump;
}

/// In-memory, mutable record store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: HashMap<RecordId, Record>,
}

impl RecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. Returns the record it replaced.
    pub fn put(&mut self, record: impl Into<Record>) -> Option<Record> {
        let record = record.into();
        self.records.insert(record.id(), record)
    }

    /// Remove a record from the store.
    pub fn remove(&mut self, id: &RecordId) -> Option<Record> {
        self.records.remove(id)
    }

    /// Get a record by id.
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the store to JSON (an id-to-record object).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.dump())
    }

    /// Load a store from JSON. Records are keyed by their own id.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let dump: StoreDump = serde_json::from_str(json)?;
        let mut store = Self::new();
        for record in dump.into_values() {
            store.put(record);
        }
        Ok(store)
    }
}

impl StoreSource for RecordStore {
    fn dump(&self) -> StoreDump {
        self.records
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }
}
