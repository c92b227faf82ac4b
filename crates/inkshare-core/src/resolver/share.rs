//! Resolver that re-hosts transient asset payloads for sharing.

use super::{AssetResolver, ResolveError, ResolveResult, parse_data_url};
use crate::blob::{BlobStore, BoxFuture, sanitize_object_name};
use crate::media::MediaType;
use crate::records::{AssetKind, AssetRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Where an asset's payload currently lives.
enum Source<'a> {
    /// Nothing to move: no source, a hosted URL, or a bookmark.
    Durable,
    /// Inline `data:` URL.
    Inline(&'a str),
    /// `blob:` URL only valid inside the session that created it.
    SessionBlob(&'a str),
}

fn classify(asset: &AssetRecord) -> Source<'_> {
    if asset.kind == AssetKind::Bookmark {
        return Source::Durable;
    }
    match asset.src() {
        Some(src) if src.starts_with("data:") => Source::Inline(src),
        Some(src) if src.starts_with("blob:") => Source::SessionBlob(src),
        _ => Source::Durable,
    }
}

/// Uploads inline and session-local asset payloads to a [`BlobStore`] and
/// rewrites `src` to the hosted URL.
///
/// Assets that are already hosted are returned untouched.
pub struct ShareAssetResolver<S: BlobStore> {
    store: Arc<S>,
    /// Payloads for `blob:` URLs, keyed by URL.
    session_blobs: HashMap<String, Vec<u8>>,
}

impl<S: BlobStore> ShareAssetResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            session_blobs: HashMap::new(),
        }
    }

    /// Register the payload behind a `blob:` URL.
    pub fn with_session_blob(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.session_blobs.insert(url.into(), bytes);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn upload(
        &self,
        mut asset: AssetRecord,
        bytes: Vec<u8>,
        mime: Option<String>,
    ) -> ResolveResult<AssetRecord> {
        let media = mime
            .as_deref()
            .and_then(MediaType::from_mime_type)
            .or_else(|| MediaType::from_magic_bytes(&bytes))
            .unwrap_or(MediaType::Binary);
        let object_name = object_name_for(&asset, media);
        log::debug!(
            "Uploading {} ({} bytes, {}) as {}",
            asset.id,
            bytes.len(),
            media.mime_type(),
            object_name
        );

        let url = self
            .store
            .put(&object_name, bytes)
            .await
            .map_err(|source| ResolveError::Upload {
                asset: asset.id.to_string(),
                source,
            })?;

        asset.set_src(url);
        if asset.mime_type().is_none() {
            asset.props.insert(
                "mimeType".to_string(),
                Value::String(mime.unwrap_or_else(|| media.mime_type().to_string())),
            );
        }
        Ok(asset)
    }
}

/// `{uuid}-{name}` with an extension matching the payload.
fn object_name_for(asset: &AssetRecord, media: MediaType) -> String {
    let stem = asset
        .name()
        .and_then(sanitize_object_name)
        .unwrap_or_else(|| "asset".to_string());
    let has_extension = MediaType::from_file_name(&stem) == Some(media);
    if has_extension {
        format!("{}-{}", Uuid::new_v4(), stem)
    } else {
        format!("{}-{}.{}", Uuid::new_v4(), stem, media.extension())
    }
}

impl<S: BlobStore> AssetResolver for ShareAssetResolver<S> {
    fn resolve(&self, asset: AssetRecord) -> BoxFuture<'_, ResolveResult<AssetRecord>> {
        Box::pin(async move {
            let (bytes, mime) = match classify(&asset) {
                Source::Durable => return Ok(asset),
                Source::Inline(src) => {
                    let data = parse_data_url(src).map_err(|reason| ResolveError::InvalidDataUrl {
                        asset: asset.id.to_string(),
                        reason,
                    })?;
                    (data.bytes, data.mime_type.or_else(|| asset.mime_type().map(str::to_string)))
                }
                Source::SessionBlob(src) => {
                    let bytes = self.session_blobs.get(src).cloned().ok_or_else(|| {
                        ResolveError::UnresolvableSource {
                            asset: asset.id.to_string(),
                            src: src.to_string(),
                        }
                    })?;
                    (bytes, asset.mime_type().map(str::to_string))
                }
            };
            self.upload(asset, bytes, mime).await
        })
    }
}
