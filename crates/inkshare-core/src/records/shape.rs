//! Shape records.

use super::{AssetId, RecordError, RecordId, take_object, take_string};
use serde_json::{Map, Value};

/// Property that links a shape to the asset it displays.
const ASSET_ID_PROP: &str = "assetId";

/// A shape on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub id: RecordId,
    /// Shape kind (`geo`, `image`, `video`, `bookmark`, ...).
    pub kind: String,
    /// Kind-specific property bag.
    pub props: Map<String, Value>,
    /// Position, parent, index, meta and any other field, verbatim.
    pub fields: Map<String, Value>,
    /// Whether `props` is written back when empty.
    keep_empty_props: bool,
}

impl ShapeRecord {
    /// Create a new shape with empty props.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(id),
            kind: kind.into(),
            props: Map::new(),
            fields: Map::new(),
            keep_empty_props: true,
        }
    }

    /// Set a single prop.
    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Point this shape at an asset.
    pub fn with_asset(self, asset_id: &AssetId) -> Self {
        self.with_prop(ASSET_ID_PROP, Value::String(asset_id.to_string()))
    }

    /// The asset this shape displays, if it carries a reference.
    ///
    /// Image, video and bookmark shapes hold an `assetId` prop that may be
    /// `null`; only a well-formed `asset:` id counts as a reference.
    pub fn asset_id(&self) -> Option<AssetId> {
        self.props
            .get(ASSET_ID_PROP)
            .and_then(Value::as_str)
            .and_then(AssetId::parse)
    }

    pub(super) fn from_fields(mut fields: Map<String, Value>) -> Result<Self, RecordError> {
        let id = RecordId::new(take_string(&mut fields, "id")?);
        let kind = take_string(&mut fields, "type")?;
        let props = take_object(&mut fields, "props")?;
        let keep_empty_props = props.is_some();
        Ok(Self {
            id,
            kind,
            props: props.unwrap_or_default(),
            fields,
            keep_empty_props,
        })
    }

    pub(super) fn into_fields(self) -> Map<String, Value> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id.to_string()));
        fields.insert("type".to_string(), Value::String(self.kind));
        if self.keep_empty_props || !self.props.is_empty() {
            fields.insert("props".to_string(), Value::Object(self.props));
        }
        fields
    }
}
