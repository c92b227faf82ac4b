//! Store records: shapes, assets and everything else.
//!
//! Records travel as JSON objects discriminated by their `typeName` field.
//! Shapes and assets get typed accessors for the parts the share pipeline
//! cares about; every other field is carried verbatim so a record survives a
//! dump/snapshot round trip unchanged.

mod asset;
mod id;
mod schema;
mod shape;
mod store;

pub use asset::{AssetKind, AssetRecord};
pub use id::{ASSET_PREFIX, AssetId, RecordId};
pub use schema::SerializedSchema;
pub use shape::ShapeRecord;
pub use store::{RecordStore, StoreDump, StoreSource};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Record decoding errors.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Record is not a JSON object")]
    NotAnObject,
    #[error("Record is missing field `{0}`")]
    MissingField(&'static str),
    #[error("Record field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Invalid asset id: {0}")]
    InvalidAssetId(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Any record held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Record {
    Shape(ShapeRecord),
    Asset(AssetRecord),
    /// Pages, documents, cameras, bindings... passed through untouched.
    Other(OtherRecord),
}

impl Record {
    pub fn id(&self) -> RecordId {
        match self {
            Record::Shape(shape) => shape.id.clone(),
            Record::Asset(asset) => asset.id.to_record_id(),
            Record::Other(other) => other.id.clone(),
        }
    }

    /// The `typeName` discriminator of this record.
    pub fn type_name(&self) -> &str {
        match self {
            Record::Shape(_) => "shape",
            Record::Asset(_) => "asset",
            Record::Other(other) => &other.type_name,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeRecord> {
        match self {
            Record::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetRecord> {
        match self {
            Record::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    /// Parse a record from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }
}

impl From<ShapeRecord> for Record {
    fn from(shape: ShapeRecord) -> Self {
        Record::Shape(shape)
    }
}

impl From<AssetRecord> for Record {
    fn from(asset: AssetRecord) -> Self {
        Record::Asset(asset)
    }
}

impl From<OtherRecord> for Record {
    fn from(other: OtherRecord) -> Self {
        Record::Other(other)
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(RecordError::NotAnObject);
        };
        let type_name = take_string(&mut fields, "typeName")?;
        match type_name.as_str() {
            "shape" => ShapeRecord::from_fields(fields).map(Record::Shape),
            "asset" => AssetRecord::from_fields(fields).map(Record::Asset),
            _ => {
                let id = RecordId::new(take_string(&mut fields, "id")?);
                Ok(Record::Other(OtherRecord {
                    type_name,
                    id,
                    fields,
                }))
            }
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        let (type_name, mut fields) = match record {
            Record::Shape(shape) => ("shape".to_string(), shape.into_fields()),
            Record::Asset(asset) => ("asset".to_string(), asset.into_fields()),
            Record::Other(other) => {
                let mut fields = other.fields;
                fields.insert("id".to_string(), Value::String(other.id.to_string()));
                (other.type_name, fields)
            }
        };
        fields.insert("typeName".to_string(), Value::String(type_name));
        Value::Object(fields)
    }
}

/// A record with no special meaning to the share pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherRecord {
    pub type_name: String,
    pub id: RecordId,
    /// Remaining fields, verbatim.
    pub fields: Map<String, Value>,
}

impl OtherRecord {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: RecordId::new(id),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// Remove a required string field from a record object.
fn take_string(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<String, RecordError> {
    match fields.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(RecordError::InvalidField {
            field,
            expected: "a string",
        }),
        None => Err(RecordError::MissingField(field)),
    }
}

/// Remove an optional object field. `None` when the field is absent.
fn take_object(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<Map<String, Value>>, RecordError> {
    match fields.remove(field) {
        Some(Value::Object(map)) => Ok(Some(map)),
        None => Ok(None),
        Some(_) => Err(RecordError::InvalidField {
            field,
            expected: "an object",
        }),
    }
}
