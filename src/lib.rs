//! ShaleDB - Document shredding and path-addressed mutation engine
//!
//! Shale converts arbitrary nested JSON documents into a canonical,
//! indexable representation for a column store with no native JSON
//! semantics, and applies MongoDB-style update operators over the same
//! path-addressing scheme.
//!
//! # Quick Start
//!
//! ```
//! use shaledb::{DocPath, DocumentLimits, Shredder, UpdateClause};
//! use serde_json::json;
//!
//! // Shred a document into indexed facts
//! let shredder = Shredder::new(DocumentLimits::default());
//! let record = shredder.shred(&json!({"_id": "doc1", "tags": ["a", "b"]}))?;
//! let tags: DocPath = "tags".parse()?;
//! assert_eq!(record.array_size()[&tags], 2);
//!
//! // Apply a MongoDB-style update to a stored document tree
//! let clause = UpdateClause::from_json(&json!({"$pop": {"tags": 1}}))?;
//! let mut doc = match json!({"tags": ["a", "b"]}) {
//!     serde_json::Value::Object(map) => map,
//!     _ => unreachable!(),
//! };
//! assert!(clause.apply(&mut doc)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! The engine is purely computational and synchronous: every call operates
//! on its own input and produces a freshly allocated output. The shredder
//! never mutates its input (identity normalization and projection pruning
//! are copy-on-write); update operators mutate their target tree in place
//! by design, so callers must hold an exclusive copy.

// Re-export the public API from the member crates
pub use shale_core::{
    fields, json_type_name, DocPath, DocPathBuilder, DocumentId, DocumentLimits, Error,
    ExtensionTag, IdStrategy, ObjectId, PathParseError, PathSegment, Result,
};
pub use shale_shred::{
    ArrayContainsKey, DocValueHasher, IndexingProjector, ShreddedDocument,
    ShreddedDocumentBuilder, Shredder, ValueDigest,
};
pub use shale_update::{UpdateClause, UpdateOperation, UpdateOperator};
