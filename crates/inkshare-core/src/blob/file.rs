//! Directory-backed blob storage.

use super::{BlobError, BlobResult, BlobStore, BoxFuture, public_url, sanitize_object_name};
use std::fs;
use std::path::PathBuf;

/// File-based blob storage.
///
/// Stores each blob as a file in a directory that is served (by
/// `inkshare-server` or any static host) under `public_url`.
pub struct FileBlobStore {
    /// Directory holding the blobs.
    base_path: PathBuf,
    /// URL prefix the directory is reachable at.
    public_url: String,
}

impl FileBlobStore {
    /// Create a new file blob store. Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf, public_url: impl Into<String>) -> BlobResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                BlobError::Io(format!("Failed to create blob directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            public_url: public_url.into(),
        })
    }

    /// Create a file blob store in the default location.
    ///
    /// On Unix: `~/.local/share/inkshare/uploads/`
    /// On Windows: `%LOCALAPPDATA%\inkshare\uploads\`
    pub fn default_location(public_url: impl Into<String>) -> BlobResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| BlobError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("inkshare").join("uploads"), public_url)
    }

    fn blob_path(&self, object_name: &str) -> BlobResult<PathBuf> {
        let name = sanitize_object_name(object_name)
            .ok_or_else(|| BlobError::InvalidName(object_name.to_string()))?;
        Ok(self.base_path.join(name))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl BlobStore for FileBlobStore {
    fn put(&self, object_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, BlobResult<String>> {
        let path = self.blob_path(object_name);
        Box::pin(async move {
            let path = path?;
            fs::write(&path, bytes).map_err(|e| {
                BlobError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| BlobError::Other("Non UTF-8 blob name".to_string()))?;
            Ok(public_url(&self.public_url, name))
        })
    }

    fn get(&self, object_name: &str) -> BoxFuture<'_, BlobResult<Vec<u8>>> {
        let path = self.blob_path(object_name);
        let name = object_name.to_string();
        Box::pin(async move {
            let path = path?;
            if !path.is_file() {
                return Err(BlobError::NotFound(name));
            }
            fs::read(&path)
                .map_err(|e| BlobError::Io(format!("Failed to read {}: {}", path.display(), e)))
        })
    }

    fn exists(&self, object_name: &str) -> BoxFuture<'_, BlobResult<bool>> {
        let path = self.blob_path(object_name);
        Box::pin(async move { Ok(path.is_ok_and(|p| p.is_file())) })
    }
}
