//! Core types for the Shale document engine
//!
//! This crate defines the foundational types shared by the shredding
//! pipeline and the update operator engine:
//! - DocPath / DocPathBuilder: canonical path addressing inside a document
//! - DocumentId / IdStrategy: document identity and generation strategies
//! - ExtensionTag / ObjectId: extension JSON types
//! - DocumentLimits: structural and value limits configuration
//! - Error: the single error taxonomy with stable machine-readable codes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extension;
pub mod fields;
pub mod identity;
pub mod limits;
pub mod object_id;
pub mod path;

pub use error::{json_type_name, Error, Result};
pub use extension::ExtensionTag;
pub use identity::{DocumentId, IdStrategy};
pub use limits::DocumentLimits;
pub use object_id::{ObjectId, ObjectIdParseError};
pub use path::{DocPath, DocPathBuilder, PathParseError, PathSegment};
