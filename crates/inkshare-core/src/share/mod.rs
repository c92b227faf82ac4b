//! Share flow: extract a snapshot, send it, report the outcome.

mod config;
mod presentation;
pub mod protocol;
mod transport;

pub use config::ShareConfig;
pub use presentation::{LogPresentation, Presentation, TOO_BIG_EVENT, Toast};
pub use transport::{Transport, TransportError, TransportResponse, TransportResult};

use crate::records::{SerializedSchema, StoreSource};
use crate::resolver::AssetResolver;
use crate::snapshot::{ExtractError, Extraction, Snapshot, extract_snapshot};
use protocol::{CreateSnapshotRequest, CreateSnapshotResponse, NewRoomRequest, NewRoomResponse};
use std::sync::Arc;
use thiserror::Error;

/// Share errors. An oversize snapshot is reported as [`ShareOutcome::TooLarge`].
#[derive(Debug, Error)]
pub enum ShareError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Service returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("Unreadable response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// Upload the document as a new multiplayer room.
    ShareProject,
    /// Copy a shared room into a new one. Same request as `ShareProject`.
    ForkProject,
    /// Create a read-only snapshot link.
    CreateSnapshotLink { parent_slug: Option<String> },
}

impl ShareAction {
    /// Telemetry event recorded when the action starts.
    pub fn event_name(&self) -> &'static str {
        match self {
            ShareAction::ShareProject | ShareAction::ForkProject => "share-project",
            ShareAction::CreateSnapshotLink { .. } => "share-snapshot",
        }
    }
}

/// Successful (or expectedly negative) end of a share action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// A room was created; the caller should navigate to `url`.
    Room { slug: String, url: String },
    /// A snapshot was stored; `url` is the link to hand out.
    SnapshotLink { room_id: String, url: String },
    /// The snapshot exceeded the size ceiling and was not sent.
    TooLarge { size: usize },
}

/// Viewport parameters appended to produced links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportQuery {
    pairs: Vec<(String, String)>,
}

impl ViewportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `?k=v&...`, or an empty string when there is nothing to add.
    pub fn to_suffix(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        format!("?{}", query)
    }
}

/// Runs share actions against a store.
pub struct ShareService<T: Transport, R: AssetResolver, P: Presentation> {
    config: ShareConfig,
    schema: SerializedSchema,
    transport: Arc<T>,
    resolver: Arc<R>,
    presentation: Arc<P>,
}

impl<T: Transport, R: AssetResolver, P: Presentation> ShareService<T, R, P> {
    pub fn new(
        config: ShareConfig,
        transport: Arc<T>,
        resolver: Arc<R>,
        presentation: Arc<P>,
    ) -> Self {
        Self {
            config,
            schema: SerializedSchema::default(),
            transport,
            resolver,
            presentation,
        }
    }

    /// Override the schema sent with payloads.
    pub fn with_schema(mut self, schema: SerializedSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    /// Run a share action.
    ///
    /// `source` names the UI surface that triggered it (telemetry only).
    /// Failures are toasted before being returned.
    pub async fn share<S: StoreSource + ?Sized>(
        &self,
        store: &S,
        action: &ShareAction,
        source: &str,
        viewport: &ViewportQuery,
    ) -> Result<ShareOutcome, ShareError> {
        self.presentation
            .track(action.event_name(), &[("source", source.to_string())]);

        let result = self.run(store, action, viewport).await;
        match &result {
            Ok(ShareOutcome::TooLarge { size }) => {
                self.presentation.toast(Toast::too_large());
                self.presentation
                    .track(TOO_BIG_EVENT, &[("size", size.to_string())]);
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Share failed: {}", e);
                self.presentation.toast(Toast::upload_failed());
            }
        }
        result
    }

    async fn run<S: StoreSource + ?Sized>(
        &self,
        store: &S,
        action: &ShareAction,
        viewport: &ViewportQuery,
    ) -> Result<ShareOutcome, ShareError> {
        let dump = store.dump();
        let gate = self.config.size_gate();
        let snapshot = match extract_snapshot(dump, self.resolver.as_ref(), &gate).await? {
            Extraction::Accepted(snapshot) => snapshot,
            Extraction::Rejected { size } => return Ok(ShareOutcome::TooLarge { size }),
        };

        match action {
            ShareAction::ShareProject | ShareAction::ForkProject => {
                self.create_room(snapshot, viewport).await
            }
            ShareAction::CreateSnapshotLink { parent_slug } => {
                self.create_snapshot(snapshot, parent_slug.clone(), viewport)
                    .await
            }
        }
    }

    async fn create_room(
        &self,
        snapshot: Snapshot,
        viewport: &ViewportQuery,
    ) -> Result<ShareOutcome, ShareError> {
        let body = serde_json::to_vec(&NewRoomRequest {
            schema: self.schema.clone(),
            snapshot,
        })
        .map_err(ShareError::Encode)?;

        let response = self
            .transport
            .post_json(&self.config.new_room_path, body)
            .await?;
        let reply: NewRoomResponse = parse_reply(&response)?;

        match reply {
            NewRoomResponse {
                error: false,
                slug: Some(slug),
                ..
            } => {
                let url = self
                    .config
                    .link(&format!("/r/{}{}", slug, viewport.to_suffix()));
                log::info!("Created room {}", slug);
                Ok(ShareOutcome::Room { slug, url })
            }
            NewRoomResponse { message, .. } => Err(ShareError::Remote {
                status: response.status,
                message: message.unwrap_or_else(|| "room was not created".to_string()),
            }),
        }
    }

    async fn create_snapshot(
        &self,
        snapshot: Snapshot,
        parent_slug: Option<String>,
        viewport: &ViewportQuery,
    ) -> Result<ShareOutcome, ShareError> {
        let body = serde_json::to_vec(&CreateSnapshotRequest {
            schema: self.schema.clone(),
            snapshot,
            parent_slug,
        })
        .map_err(ShareError::Encode)?;

        let response = self
            .transport
            .post_json(&self.config.snapshot_path, body)
            .await?;
        let reply: CreateSnapshotResponse = parse_reply(&response)?;

        match reply {
            CreateSnapshotResponse {
                error: false,
                room_id: Some(room_id),
                ..
            } => {
                let url = self
                    .config
                    .link(&format!("/s/{}{}", room_id, viewport.to_suffix()));
                log::info!("Created snapshot {}", room_id);
                Ok(ShareOutcome::SnapshotLink { room_id, url })
            }
            CreateSnapshotResponse { message, .. } => Err(ShareError::Remote {
                status: response.status,
                message: message.unwrap_or_else(|| "snapshot was not created".to_string()),
            }),
        }
    }
}

/// Decode a reply, treating any non-2xx status as a failure.
fn parse_reply<T>(response: &TransportResponse) -> Result<T, ShareError>
where
    T: serde::de::DeserializeOwned,
{
    if !response.is_success() {
        let message = serde_json::from_slice::<protocol::ErrorResponse>(&response.body)
            .map(|e| e.message)
            .unwrap_or_else(|_| response.text());
        return Err(ShareError::Remote {
            status: response.status,
            message,
        });
    }
    serde_json::from_slice(&response.body).map_err(ShareError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BoxFuture;
    use crate::records::{AssetId, AssetKind, AssetRecord, OtherRecord, RecordStore, ShapeRecord};
    use crate::resolver::IdentityResolver;
    use crate::test_util::block_on;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Replies with a canned response and keeps every request.
    struct StubTransport {
        status: u16,
        reply: Value,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl StubTransport {
        fn new(status: u16, reply: Value) -> Self {
            Self {
                status,
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        fn post_json(
            &self,
            path: &str,
            body: Vec<u8>,
        ) -> BoxFuture<'_, TransportResult<TransportResponse>> {
            let parsed: Value = serde_json::from_slice(&body).unwrap();
            self.requests.lock().unwrap().push((path.to_string(), parsed));
            let response = TransportResponse {
                status: self.status,
                body: serde_json::to_vec(&self.reply).unwrap(),
            };
            Box::pin(async move { Ok(response) })
        }
    }

    #[derive(Default)]
    struct RecordingPresentation {
        toasts: Mutex<Vec<Toast>>,
        events: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Presentation for RecordingPresentation {
        fn toast(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }

        fn track(&self, event: &str, properties: &[(&str, String)]) {
            let props = properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            self.events.lock().unwrap().push((event.to_string(), props));
        }
    }

    impl RecordingPresentation {
        fn event_names(&self) -> Vec<String> {
            self.events.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
        }
    }

    fn store() -> RecordStore {
        let asset_id = AssetId::parse("asset:1").unwrap();
        let mut store = RecordStore::new();
        store.put(OtherRecord::new("page", "page:1"));
        store.put(ShapeRecord::new("shape:1", "image").with_asset(&asset_id));
        store.put(AssetRecord::new(asset_id, AssetKind::Image).with_src("https://cdn.test/a.png"));
        store.put(
            AssetRecord::new(AssetId::parse("asset:stale").unwrap(), AssetKind::Image)
                .with_src("https://cdn.test/old.png"),
        );
        store
    }

    type TestService = ShareService<StubTransport, IdentityResolver, RecordingPresentation>;

    fn service(
        transport: StubTransport,
        max_bytes: Option<usize>,
    ) -> (TestService, Arc<StubTransport>, Arc<RecordingPresentation>) {
        let mut config = ShareConfig {
            origin: "https://ink.test".to_string(),
            ..ShareConfig::default()
        };
        if let Some(max) = max_bytes {
            config.max_snapshot_bytes = max;
        }
        let transport = Arc::new(transport);
        let presentation = Arc::new(RecordingPresentation::default());
        let service = ShareService::new(
            config,
            transport.clone(),
            Arc::new(IdentityResolver),
            presentation.clone(),
        );
        (service, transport, presentation)
    }

    #[test]
    fn test_share_project_creates_room() {
        let (service, transport, presentation) =
            service(StubTransport::new(200, json!({"error": false, "slug": "abc"})), None);
        let viewport = ViewportQuery::new().with("v", "0,0,100,100").with("p", "page:1");

        let outcome = block_on(service.share(
            &store(),
            &ShareAction::ShareProject,
            "menu",
            &viewport,
        ))
        .unwrap();
        assert_eq!(
            outcome,
            ShareOutcome::Room {
                slug: "abc".to_string(),
                url: "https://ink.test/r/abc?v=0%2C0%2C100%2C100&p=page%3A1".to_string(),
            }
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let (path, body) = &requests[0];
        assert_eq!(path, "/api/new-room");
        assert!(body["schema"]["schemaVersion"].is_number());
        let snapshot = body["snapshot"].as_object().unwrap();
        assert!(snapshot.contains_key("asset:1"));
        assert!(!snapshot.contains_key("asset:stale"));
        assert_eq!(presentation.event_names(), vec!["share-project"]);
        assert!(presentation.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_link_sends_parent_slug() {
        let (service, transport, _) =
            service(StubTransport::new(200, json!({"error": false, "roomId": "snap1"})), None);
        let action = ShareAction::CreateSnapshotLink {
            parent_slug: Some("room-9".to_string()),
        };

        let outcome = block_on(service.share(
            &store(),
            &action,
            "share-menu",
            &ViewportQuery::new(),
        ))
        .unwrap();
        assert_eq!(
            outcome,
            ShareOutcome::SnapshotLink {
                room_id: "snap1".to_string(),
                url: "https://ink.test/s/snap1".to_string(),
            }
        );
        let (path, body) = &transport.requests()[0];
        assert_eq!(path, "/api/snapshots");
        assert_eq!(body["parent_slug"], "room-9");
    }

    #[test]
    fn test_too_large_is_not_sent() {
        let (service, transport, presentation) =
            service(StubTransport::new(200, json!({"error": false, "slug": "abc"})), Some(10));

        let outcome = block_on(service.share(
            &store(),
            &ShareAction::ShareProject,
            "menu",
            &ViewportQuery::new(),
        ))
        .unwrap();
        assert!(matches!(outcome, ShareOutcome::TooLarge { size } if size > 10));
        assert!(transport.requests().is_empty());
        assert_eq!(presentation.event_names(), vec!["share-project", TOO_BIG_EVENT]);
        assert_eq!(presentation.toasts.lock().unwrap()[0], Toast::too_large());
    }

    #[test]
    fn test_error_flag_is_failure() {
        let (service, _, presentation) =
            service(StubTransport::new(200, json!({"error": true, "message": "full"})), None);

        let err = block_on(service.share(
            &store(),
            &ShareAction::ForkProject,
            "menu",
            &ViewportQuery::new(),
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ShareError::Remote { status: 200, ref message } if message == "full"
        ));
        assert_eq!(presentation.toasts.lock().unwrap()[0], Toast::upload_failed());
    }

    #[test]
    fn test_http_error_is_failure() {
        let (service, _, _) =
            service(StubTransport::new(500, json!({"error": true, "message": "boom"})), None);
        let action = ShareAction::CreateSnapshotLink { parent_slug: None };

        let err = block_on(service.share(
            &store(),
            &action,
            "menu",
            &ViewportQuery::new(),
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ShareError::Remote { status: 500, ref message } if message == "boom"
        ));
    }

    #[test]
    fn test_custom_schema_is_sent() {
        let (service, transport, _) =
            service(StubTransport::new(200, json!({"error": false, "slug": "abc"})), None);
        let schema = SerializedSchema {
            schema_version: 1,
            sequences: [("com.example.store".to_string(), 7)].into_iter().collect(),
        };
        let service = service.with_schema(schema);
        assert_eq!(service.config().origin, "https://ink.test");

        block_on(service.share(&store(), &ShareAction::ShareProject, "menu", &ViewportQuery::new()))
            .unwrap();
        let (_, body) = &transport.requests()[0];
        assert_eq!(
            body["schema"],
            json!({"schemaVersion": 1, "sequences": {"com.example.store": 7}})
        );
    }

    #[test]
    fn test_viewport_suffix() {
        assert_eq!(ViewportQuery::new().to_suffix(), "");
        assert_eq!(ViewportQuery::new().with("d", "v1 2").to_suffix(), "?d=v1+2");
    }
}
