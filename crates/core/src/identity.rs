//! Document identity
//!
//! Every stored document carries an `_id` property as its logical first
//! property. The identity value is a tagged union over the plain JSON
//! scalars plus the extension types (ObjectId, UUID, Date). When a document
//! arrives without an `_id`, one is generated per the collection's
//! configured [`IdStrategy`]; an existing `_id` is validated but never
//! regenerated.

use crate::error::{Error, Result};
use crate::extension::ExtensionTag;
use crate::object_id::ObjectId;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Number, Value};
use std::fmt;
use uuid::{NoContext, Timestamp, Uuid};

/// Identity value of a document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentId {
    /// Plain string id
    String(String),
    /// Numeric id
    Number(Number),
    /// Boolean id
    Boolean(bool),
    /// Explicit null id
    Null,
    /// `{"$objectId": "<24-hex>"}`
    ObjectId(ObjectId),
    /// `{"$uuid": "<canonical form>"}`, any RFC 4122 version
    Uuid(Uuid),
    /// `{"$date": <epoch millis>}`
    Date(DateTime<Utc>),
}

impl DocumentId {
    /// Parse an identity from its JSON representation
    ///
    /// Objects are accepted only as recognized extension type wrappers;
    /// anything else (arrays, multi-property objects, unknown tags, wrong
    /// inner value shapes) fails with `BadDocIdType`.
    pub fn from_json(value: &Value) -> Result<DocumentId> {
        match value {
            Value::String(s) => Ok(DocumentId::String(s.clone())),
            Value::Number(n) => Ok(DocumentId::Number(n.clone())),
            Value::Bool(b) => Ok(DocumentId::Boolean(*b)),
            Value::Null => Ok(DocumentId::Null),
            Value::Object(obj) => Self::from_extension_wrapper(obj),
            Value::Array(_) => Err(Error::BadDocIdType {
                message: "unsupported JSON value type array".to_string(),
            }),
        }
    }

    fn from_extension_wrapper(obj: &Map<String, Value>) -> Result<DocumentId> {
        let mut entries = obj.iter();
        let (key, inner) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(Error::BadDocIdType {
                    message: format!(
                        "object value must be a single-property extension type wrapper, got {} properties",
                        obj.len()
                    ),
                })
            }
        };
        let tag = ExtensionTag::from_encoded_name(key).ok_or_else(|| Error::BadDocIdType {
            message: format!("unrecognized extension type tag '{}'", key),
        })?;
        match tag {
            ExtensionTag::ObjectId => {
                let text = inner.as_str().ok_or_else(|| bad_wrapper(tag, inner))?;
                let id = text.parse().map_err(|_| bad_wrapper(tag, inner))?;
                Ok(DocumentId::ObjectId(id))
            }
            ExtensionTag::Uuid => {
                let text = inner.as_str().ok_or_else(|| bad_wrapper(tag, inner))?;
                let id = Uuid::parse_str(text).map_err(|_| bad_wrapper(tag, inner))?;
                Ok(DocumentId::Uuid(id))
            }
            ExtensionTag::Date => {
                let millis = inner.as_i64().ok_or_else(|| bad_wrapper(tag, inner))?;
                let date = Utc
                    .timestamp_millis_opt(millis)
                    .single()
                    .ok_or_else(|| bad_wrapper(tag, inner))?;
                Ok(DocumentId::Date(date))
            }
        }
    }

    /// JSON representation, suitable for placing back into a document
    pub fn to_json(&self) -> Value {
        match self {
            DocumentId::String(s) => Value::String(s.clone()),
            DocumentId::Number(n) => Value::Number(n.clone()),
            DocumentId::Boolean(b) => Value::Bool(*b),
            DocumentId::Null => Value::Null,
            DocumentId::ObjectId(id) => {
                wrap_extension(ExtensionTag::ObjectId, Value::String(id.to_string()))
            }
            DocumentId::Uuid(id) => {
                wrap_extension(ExtensionTag::Uuid, Value::String(id.to_string()))
            }
            DocumentId::Date(ts) => wrap_extension(
                ExtensionTag::Date,
                Value::Number(Number::from(ts.timestamp_millis())),
            ),
        }
    }
}

fn bad_wrapper(tag: ExtensionTag, value: &Value) -> Error {
    Error::BadDocIdType {
        message: format!("invalid value for extension type '{}': {}", tag, value),
    }
}

fn wrap_extension(tag: ExtensionTag, value: Value) -> Value {
    let mut obj = Map::with_capacity(1);
    obj.insert(tag.encoded_name().to_string(), value);
    Value::Object(obj)
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::String(s) => f.write_str(s),
            DocumentId::Number(n) => write!(f, "{}", n),
            DocumentId::Boolean(b) => write!(f, "{}", b),
            DocumentId::Null => f.write_str("null"),
            DocumentId::ObjectId(id) => write!(f, "{}", id),
            DocumentId::Uuid(id) => write!(f, "{}", id),
            DocumentId::Date(ts) => write!(f, "{}", ts.timestamp_millis()),
        }
    }
}

// =============================================================================
// Generation strategies
// =============================================================================

/// Per-collection strategy for generating an `_id` when a document arrives
/// without one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Unwrapped random UUIDv4 rendered as a plain JSON string (legacy
    /// default)
    #[default]
    LegacyUuid,
    /// Wrapped random UUIDv4: `{"$uuid": "..."}`
    WrappedUuid,
    /// Wrapped time-ordered UUIDv6 (reordered Gregorian)
    WrappedUuidV6,
    /// Wrapped time-ordered UUIDv7 (Unix epoch based)
    WrappedUuidV7,
    /// Wrapped ObjectId: `{"$objectId": "..."}`
    WrappedObjectId,
}

impl IdStrategy {
    /// Generate a fresh identity value per this strategy
    pub fn generate(&self) -> Value {
        match self {
            IdStrategy::LegacyUuid => Value::String(Uuid::new_v4().to_string()),
            IdStrategy::WrappedUuid => wrap_extension(
                ExtensionTag::Uuid,
                Value::String(Uuid::new_v4().to_string()),
            ),
            IdStrategy::WrappedUuidV6 => {
                let id = Uuid::new_v6(Timestamp::now(NoContext), &rand::random::<[u8; 6]>());
                wrap_extension(ExtensionTag::Uuid, Value::String(id.to_string()))
            }
            IdStrategy::WrappedUuidV7 => {
                let id = Uuid::new_v7(Timestamp::now(NoContext));
                wrap_extension(ExtensionTag::Uuid, Value::String(id.to_string()))
            }
            IdStrategy::WrappedObjectId => wrap_extension(
                ExtensionTag::ObjectId,
                Value::String(ObjectId::new().to_string()),
            ),
        }
    }
}
