//! In-memory blob storage implementation.

use super::{BlobError, BlobResult, BlobStore, BoxFuture, public_url, sanitize_object_name};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory blob storage for testing and ephemeral use.
pub struct MemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create a new empty store whose blobs are reported under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of every stored blob.
    pub fn object_names(&self) -> Vec<String> {
        self.blobs
            .read()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, object_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, BlobResult<String>> {
        let name = sanitize_object_name(object_name);
        let raw = object_name.to_string();
        Box::pin(async move {
            let name = name.ok_or(BlobError::InvalidName(raw))?;
            let mut blobs = self
                .blobs
                .write()
                .map_err(|e| BlobError::Other(format!("Lock error: {}", e)))?;
            let url = public_url(&self.base_url, &name);
            blobs.insert(name, bytes);
            Ok(url)
        })
    }

    fn get(&self, object_name: &str) -> BoxFuture<'_, BlobResult<Vec<u8>>> {
        let name = sanitize_object_name(object_name);
        let raw = object_name.to_string();
        Box::pin(async move {
            let name = name.ok_or_else(|| BlobError::InvalidName(raw.clone()))?;
            let blobs = self
                .blobs
                .read()
                .map_err(|e| BlobError::Other(format!("Lock error: {}", e)))?;
            blobs.get(&name).cloned().ok_or(BlobError::NotFound(raw))
        })
    }

    fn exists(&self, object_name: &str) -> BoxFuture<'_, BlobResult<bool>> {
        let name = sanitize_object_name(object_name);
        Box::pin(async move {
            let blobs = self
                .blobs
                .read()
                .map_err(|e| BlobError::Other(format!("Lock error: {}", e)))?;
            Ok(name.is_some_and(|name| blobs.contains_key(&name)))
        })
    }
}
