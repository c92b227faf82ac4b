//! Asset durability: turning transient asset sources into hosted ones.

mod data_url;
mod share;

pub use data_url::{DataUrl, parse_data_url};
pub use share::ShareAssetResolver;

use crate::blob::{BlobError, BoxFuture};
use crate::records::AssetRecord;
use thiserror::Error;

/// Asset resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Asset {asset} has an unreadable data URL: {reason}")]
    InvalidDataUrl { asset: String, reason: String },
    #[error("Asset {asset} points at a transient blob that is no longer available: {src}")]
    UnresolvableSource { asset: String, src: String },
    #[error("Failed to upload asset {asset}: {source}")]
    Upload {
        asset: String,
        #[source]
        source: BlobError,
    },
}

/// Result type for asset resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Makes an asset durable.
///
/// The returned record keeps the input's id. Implementations must be safe to
/// call concurrently for distinct assets.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, asset: AssetRecord) -> BoxFuture<'_, ResolveResult<AssetRecord>>;
}

/// Resolver that treats every asset as already durable.
///
/// Useful for pruning a dump without touching asset sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl AssetResolver for IdentityResolver {
    fn resolve(&self, asset: AssetRecord) -> BoxFuture<'_, ResolveResult<AssetRecord>> {
        Box::pin(async move { Ok(asset) })
    }
}
