//! Blob storage for durable asset payloads.

mod file;
mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Blob storage errors.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),
    #[error("Invalid object name: {0:?}")]
    InvalidName(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Blob storage error: {0}")]
    Other(String),
}

/// Result type for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for blob storage backends.
///
/// Implementations can keep blobs in memory, on the local filesystem behind
/// a public URL, or on a remote upload service.
pub trait BlobStore: Send + Sync {
    /// Store a blob under `object_name`, returning the URL it is hosted at.
    fn put(&self, object_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, BlobResult<String>>;

    /// Read a blob back.
    fn get(&self, object_name: &str) -> BoxFuture<'_, BlobResult<Vec<u8>>>;

    /// Check if a blob exists.
    fn exists(&self, object_name: &str) -> BoxFuture<'_, BlobResult<bool>>;
}

/// Reduce a name to characters that are safe in file names and URL paths.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_object_name(name: &str) -> Option<String> {
    let mut safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // No hidden files and no `..`
    if safe.starts_with('.') {
        safe.insert(0, '_');
    }
    if safe.trim_matches(|c| c == '_' || c == '.').is_empty() {
        None
    } else {
        Some(safe)
    }
}

/// Join a public base URL and an object name.
pub(crate) fn public_url(base: &str, object_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), object_name)
}
