//! InkShare Core Library
//!
//! Prepares shareable snapshots of a live whiteboard record store: prunes
//! cached assets nobody references, makes the referenced ones durable, and
//! gates the result on its serialized size before it is handed to a transport.

pub mod blob;
pub mod media;
pub mod records;
pub mod resolver;
pub mod share;
pub mod snapshot;

pub use blob::{BlobError, BlobResult, BlobStore, BoxFuture, FileBlobStore, MemoryBlobStore};
pub use media::MediaType;
pub use records::{
    AssetId, AssetKind, AssetRecord, OtherRecord, Record, RecordError, RecordId, RecordStore,
    SerializedSchema, ShapeRecord, StoreDump, StoreSource,
};
pub use resolver::{
    AssetResolver, IdentityResolver, ResolveError, ResolveResult, ShareAssetResolver,
};
pub use share::{
    LogPresentation, Presentation, ShareAction, ShareConfig, ShareError, ShareOutcome,
    ShareService, Toast, Transport, TransportError, TransportResponse, ViewportQuery,
};
pub use snapshot::{
    ExtractError, Extraction, MAX_SNAPSHOT_BYTES, SizeGate, Snapshot, extract_snapshot,
};
