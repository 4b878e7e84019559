//! Extension JSON types
//!
//! Values with no native JSON representation are wire-encoded as a
//! single-property object whose property name is a reserved tag:
//! `{"$objectId": "..."}`, `{"$uuid": "..."}`, `{"$date": 1672531200000}`.
//! The tag set is closed; unrecognized tags are rejected at validation time,
//! never silently passed through.

use std::fmt;

/// Closed set of recognized extension type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionTag {
    /// 12-byte ObjectId, 24-char hex string value
    ObjectId,
    /// RFC 4122 UUID (any version), canonical hyphenated string value
    Uuid,
    /// Timestamp, integral epoch-milliseconds value
    Date,
}

impl ExtensionTag {
    /// All recognized tags
    pub const ALL: [ExtensionTag; 3] =
        [ExtensionTag::ObjectId, ExtensionTag::Uuid, ExtensionTag::Date];

    /// Property name used in the wire encoding
    pub fn encoded_name(&self) -> &'static str {
        match self {
            ExtensionTag::ObjectId => "$objectId",
            ExtensionTag::Uuid => "$uuid",
            ExtensionTag::Date => "$date",
        }
    }

    /// Look up a tag by its encoded property name
    pub fn from_encoded_name(name: &str) -> Option<ExtensionTag> {
        match name {
            "$objectId" => Some(ExtensionTag::ObjectId),
            "$uuid" => Some(ExtensionTag::Uuid),
            "$date" => Some(ExtensionTag::Date),
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoded_name())
    }
}
