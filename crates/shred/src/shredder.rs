//! Shredding pipeline
//!
//! Shreds an incoming JSON document into the flat facts stored in the
//! column store, and normalizes the document on the way: the `_id` property
//! is generated when absent and always re-ordered to be the logical first
//! property of the stored text.
//!
//! Pipeline per call: root type check, identity normalization
//! (copy-on-write), full-document structural validation, canonical compact
//! re-serialization + size check, optional indexing projection on a copy,
//! value-limit validation over the indexable copy, fact traversal, terminal
//! record build. The input tree is never mutated.

use crate::projection::IndexingProjector;
use crate::record::{ShreddedDocument, ShreddedDocumentBuilder};
use crate::validate::{FullDocValidator, IndexableValueValidator};
use serde_json::{Map, Value};
use shale_core::{
    fields, json_type_name, DocPath, DocPathBuilder, DocumentId, DocumentLimits, Error, IdStrategy,
    Result,
};
use tracing::debug;
use uuid::Uuid;

/// Shreds JSON documents into [`ShreddedDocument`] records
///
/// Stateless per call: safe to share across threads; the only state is the
/// read-only limits configuration and the identity generation strategy.
#[derive(Debug, Clone)]
pub struct Shredder {
    limits: DocumentLimits,
    id_strategy: IdStrategy,
}

impl Shredder {
    /// Shredder with the given limits and the default (legacy UUID)
    /// identity strategy
    pub fn new(limits: DocumentLimits) -> Self {
        Shredder {
            limits,
            id_strategy: IdStrategy::default(),
        }
    }

    /// Shredder with an explicit identity generation strategy
    pub fn with_id_strategy(limits: DocumentLimits, id_strategy: IdStrategy) -> Self {
        Shredder { limits, id_strategy }
    }

    /// The configured limits
    pub fn limits(&self) -> &DocumentLimits {
        &self.limits
    }

    /// Shred with no transaction id and the identity projector
    pub fn shred(&self, doc: &Value) -> Result<ShreddedDocument> {
        self.shred_with(doc, None, &IndexingProjector::identity())
    }

    /// Shred a document
    ///
    /// `tx_id` is an optional caller-supplied transaction identifier carried
    /// through to the record; `projector` prunes non-indexed branches before
    /// the value-limit pass and the fact traversal (the stored text always
    /// retains the full document).
    pub fn shred_with(
        &self,
        doc: &Value,
        tx_id: Option<Uuid>,
        projector: &IndexingProjector,
    ) -> Result<ShreddedDocument> {
        // Requiring a place for _id means the root must be an object.
        let obj = match doc {
            Value::Object(obj) => obj,
            other => {
                return Err(Error::BadDocumentType {
                    actual: json_type_name(other),
                })
            }
        };

        let (doc_with_id, doc_id) = self.normalize_document_id(obj)?;
        debug!(target: "shale::shred", doc_id = %doc_id, "shredding document");

        // Structural limits are checked on the full document, before any
        // pruning; value limits wait until the projection is applied.
        FullDocValidator::new(&self.limits).validate(&doc_with_id)?;

        // Re-serialize now that _id is first; this also unifies escaping
        // and drops any pretty-printing from the incoming text.
        let doc_value = Value::Object(doc_with_id);
        let doc_json = doc_value.to_string();
        self.validate_document_size(&doc_json)?;

        let mut builder = ShreddedDocumentBuilder::new(doc_id, tx_id, doc_json);

        // Projection must not modify the document being stored, so it
        // operates on a copy; the identity projector skips the copy.
        let indexable: Value;
        let indexable_ref = if projector.is_identity() {
            &doc_value
        } else {
            let mut copy = doc_value.clone();
            if let Value::Object(map) = &mut copy {
                projector.apply(map);
            }
            indexable = copy;
            &indexable
        };

        IndexableValueValidator::new(&self.limits).validate(indexable_ref)?;

        traverse(indexable_ref, &mut builder, &mut DocPathBuilder::root())?;
        Ok(builder.build())
    }

    /// Ensure the document has an `_id` (generating one if necessary) and
    /// that it is the very first property, reordering as needed
    ///
    /// A new map is constructed and returned; the input is never modified.
    fn normalize_document_id(
        &self,
        doc: &Map<String, Value>,
    ) -> Result<(Map<String, Value>, DocumentId)> {
        let id_value = match doc.get(fields::DOC_ID) {
            Some(existing) => existing.clone(),
            None => self.id_strategy.generate(),
        };
        let doc_id = DocumentId::from_json(&id_value)?;

        let mut with_id = Map::with_capacity(doc.len() + 1);
        with_id.insert(fields::DOC_ID.to_string(), id_value);
        for (key, value) in doc {
            if key != fields::DOC_ID {
                with_id.insert(key.clone(), value.clone());
            }
        }
        Ok((with_id, doc_id))
    }

    fn validate_document_size(&self, doc_json: &str) -> Result<()> {
        if doc_json.len() > self.limits.max_size {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "document size ({} chars) exceeds maximum allowed ({})",
                    doc_json.len(),
                    self.limits.max_size
                ),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Traversal
// =============================================================================

// Root object/array nodes get no facts of their own, only their contents;
// a (rare) atomic root is recorded as a plain scalar fact.
fn traverse(
    value: &Value,
    builder: &mut ShreddedDocumentBuilder,
    path_builder: &mut DocPathBuilder,
) -> Result<()> {
    match value {
        Value::Object(map) => traverse_object(map, builder, path_builder),
        Value::Array(items) => traverse_array(items, builder, path_builder),
        other => traverse_value(other, builder, path_builder),
    }
}

fn traverse_object(
    map: &Map<String, Value>,
    builder: &mut ShreddedDocumentBuilder,
    path_builder: &mut DocPathBuilder,
) -> Result<()> {
    for (key, value) in map {
        path_builder.property(key.as_str());
        traverse_value(value, builder, path_builder)?;
    }
    Ok(())
}

fn traverse_array(
    items: &[Value],
    builder: &mut ShreddedDocumentBuilder,
    path_builder: &mut DocPathBuilder,
) -> Result<()> {
    for (ix, value) in items.iter().enumerate() {
        path_builder.index(ix);
        traverse_value(value, builder, path_builder)?;
    }
    Ok(())
}

fn traverse_value(
    value: &Value,
    builder: &mut ShreddedDocumentBuilder,
    path_builder: &mut DocPathBuilder,
) -> Result<()> {
    let path = path_builder.build();

    if path.is_top_level_property(fields::VECTOR_FIELD) {
        return traverse_vector(path, value, builder);
    }
    if path.is_top_level_property(fields::VECTORIZE_FIELD) {
        return traverse_vectorize(path, value, builder);
    }

    match value {
        Value::Object(map) => {
            if builder.shred_object(path, value) {
                traverse_object(map, builder, &mut path_builder.nested_object_builder())?;
            }
        }
        Value::Array(items) => {
            builder.shred_array(path, value, items);
            traverse_array(items, builder, &mut path_builder.nested_array_builder())?;
        }
        Value::String(text) => builder.shred_text(path, text),
        Value::Number(number) => builder.shred_number(path, number),
        Value::Bool(b) => builder.shred_boolean(path, *b),
        Value::Null => builder.shred_null(path),
    }
    Ok(())
}

/// The reserved embedding field must be a non-empty array of numbers; it is
/// recorded as a single vector fact, never traversed as a generic array. A
/// null value is silently skipped.
fn traverse_vector(
    path: DocPath,
    value: &Value,
    builder: &mut ShreddedDocumentBuilder,
) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(Error::BadVectorSize);
            }
            let mut vector = Vec::with_capacity(items.len());
            for item in items {
                let number = item.as_f64().ok_or(Error::BadVectorType {
                    actual: json_type_name(item),
                })?;
                vector.push(number as f32);
            }
            builder.shred_vector(path, vector);
            Ok(())
        }
        other => Err(Error::BadVectorType {
            actual: json_type_name(other),
        }),
    }
}

/// The source-text field is stored opaquely; only its presence is recorded.
/// A null value is silently skipped.
fn traverse_vectorize(
    path: DocPath,
    value: &Value,
    builder: &mut ShreddedDocumentBuilder,
) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    builder.shred_vectorize(path);
    Ok(())
}
