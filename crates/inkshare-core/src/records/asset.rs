//! Asset records describing externally stored media.

use super::{AssetId, RecordError, take_object, take_string};
use serde_json::{Map, Value};

/// What kind of media an asset describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
    /// Link previews. Their `src` is a remote page, never uploaded.
    Bookmark,
    Other(String),
}

impl AssetKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "image" => AssetKind::Image,
            "video" => AssetKind::Video,
            "bookmark" => AssetKind::Bookmark,
            other => AssetKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Bookmark => "bookmark",
            AssetKind::Other(kind) => kind,
        }
    }
}

/// An asset in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub id: AssetId,
    pub kind: AssetKind,
    /// `src`, `name`, `mimeType`, `w`, `h`, ...
    pub props: Map<String, Value>,
    /// Meta and any other field, verbatim.
    pub fields: Map<String, Value>,
    /// Whether `props` is written back when empty.
    keep_empty_props: bool,
}

impl AssetRecord {
    pub fn new(id: AssetId, kind: AssetKind) -> Self {
        Self {
            id,
            kind,
            props: Map::new(),
            fields: Map::new(),
            keep_empty_props: true,
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    pub fn with_src(self, src: impl Into<String>) -> Self {
        self.with_prop("src", Value::String(src.into()))
    }

    /// Where the binary payload lives. `None` when unset or `null`.
    pub fn src(&self) -> Option<&str> {
        self.props.get("src").and_then(Value::as_str)
    }

    pub fn set_src(&mut self, src: impl Into<String>) {
        self.props.insert("src".to_string(), Value::String(src.into()));
    }

    pub fn name(&self) -> Option<&str> {
        self.props.get("name").and_then(Value::as_str)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.props.get("mimeType").and_then(Value::as_str)
    }

    pub(super) fn from_fields(mut fields: Map<String, Value>) -> Result<Self, RecordError> {
        let raw_id = take_string(&mut fields, "id")?;
        let id = AssetId::parse(&raw_id).ok_or(RecordError::InvalidAssetId(raw_id))?;
        let kind = AssetKind::parse(&take_string(&mut fields, "type")?);
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
        fields.insert("type".to_string(), Value::String(self.kind.as_str().to_string()));
        if self.keep_empty_props || !self.props.is_empty() {
            fields.insert("props".to_string(), Value::Object(self.props));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip() {
        for kind in ["image", "video", "bookmark", "pdf"] {
            assert_eq!(AssetKind::parse(kind).as_str(), kind);
        }
        assert_eq!(AssetKind::parse("image"), AssetKind::Image);
    }

    #[test]
    fn test_src_accessors() {
        let id = AssetId::parse("asset:1").unwrap();
        let mut asset = AssetRecord::new(id, AssetKind::Image).with_prop("src", Value::Null);
        assert_eq!(asset.src(), None);

        asset.set_src("https://cdn.example.com/a.png");
        assert_eq!(asset.src(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_metadata_accessors() {
        let id = AssetId::parse("asset:1").unwrap();
        let asset = AssetRecord::new(id, AssetKind::Video)
            .with_prop("name", json!("clip.mp4"))
            .with_prop("mimeType", json!("video/mp4"));
        assert_eq!(asset.name(), Some("clip.mp4"));
        assert_eq!(asset.mime_type(), Some("video/mp4"));
    }
}
