//! The shredded document record
//!
//! [`ShreddedDocument`] is the immutable output of one shred call: the
//! document identity, the canonical re-serialized text, and the indexed-fact
//! collections the storage layer writes as flat columns.
//!
//! [`ShreddedDocumentBuilder`] is the mutable accumulator the traversal
//! feeds. Sub-collections start absent and are materialized on first use,
//! so memory tracks the document's shape rather than a fixed schema; the
//! terminal [`build`](ShreddedDocumentBuilder::build) converts them to
//! always-present-but-possibly-empty collections. After that point nothing
//! mutates the record.

use crate::hasher::{DocValueHasher, ValueDigest};
use serde_json::{Number, Value};
use shale_core::{DocPath, DocumentId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Composite key for one array-containment fact
///
/// Combines the array's path with the digest of one element. The two
/// components stay separate typed fields rather than being joined with a
/// textual separator, so no digest or path rendering can make two distinct
/// facts collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayContainsKey {
    /// Path of the containing array
    pub path: DocPath,
    /// Digest of the contained element
    pub digest: ValueDigest,
}

impl fmt::Display for ArrayContainsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Digest is fixed-width hex, so this form is unambiguous.
        write!(f, "{}:{}", self.path, self.digest)
    }
}

/// The fully shredded document: everything needed to write it to storage
#[derive(Debug, Clone, PartialEq)]
pub struct ShreddedDocument {
    id: DocumentId,
    tx_id: Option<Uuid>,
    doc_json: String,
    exist_keys: BTreeSet<DocPath>,
    sub_doc_equals: BTreeMap<DocPath, ValueDigest>,
    array_size: BTreeMap<DocPath, usize>,
    array_equals: BTreeMap<DocPath, ValueDigest>,
    array_contains: BTreeSet<ArrayContainsKey>,
    query_bool_values: BTreeMap<DocPath, bool>,
    query_number_values: BTreeMap<DocPath, Number>,
    query_text_values: BTreeMap<DocPath, String>,
    query_null_values: BTreeSet<DocPath>,
    query_vector_values: BTreeMap<DocPath, Vec<f32>>,
    query_vectorize_values: BTreeSet<DocPath>,
}

impl ShreddedDocument {
    /// Document identity
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Transaction id supplied by the caller, if any
    pub fn tx_id(&self) -> Option<Uuid> {
        self.tx_id
    }

    /// Canonical compact re-serialization, `_id` first
    pub fn doc_json(&self) -> &str {
        &self.doc_json
    }

    /// Every addressable path in the indexable document
    pub fn exist_keys(&self) -> &BTreeSet<DocPath> {
        &self.exist_keys
    }

    /// Whole-subtree digest per object path
    pub fn sub_doc_equals(&self) -> &BTreeMap<DocPath, ValueDigest> {
        &self.sub_doc_equals
    }

    /// Element count per array path
    pub fn array_size(&self) -> &BTreeMap<DocPath, usize> {
        &self.array_size
    }

    /// Whole-array digest per array path
    pub fn array_equals(&self) -> &BTreeMap<DocPath, ValueDigest> {
        &self.array_equals
    }

    /// One entry per array element, keyed by array path + element digest
    pub fn array_contains(&self) -> &BTreeSet<ArrayContainsKey> {
        &self.array_contains
    }

    /// Boolean scalar facts
    pub fn query_bool_values(&self) -> &BTreeMap<DocPath, bool> {
        &self.query_bool_values
    }

    /// Numeric scalar facts
    pub fn query_number_values(&self) -> &BTreeMap<DocPath, Number> {
        &self.query_number_values
    }

    /// Text scalar facts
    pub fn query_text_values(&self) -> &BTreeMap<DocPath, String> {
        &self.query_text_values
    }

    /// Paths holding an explicit null
    pub fn query_null_values(&self) -> &BTreeSet<DocPath> {
        &self.query_null_values
    }

    /// Vector embedding facts (reserved `$vector` field)
    pub fn query_vector_values(&self) -> &BTreeMap<DocPath, Vec<f32>> {
        &self.query_vector_values
    }

    /// Opaque markers for the reserved `$vectorize` field
    pub fn query_vectorize_values(&self) -> &BTreeSet<DocPath> {
        &self.query_vectorize_values
    }
}

/// Mutable accumulator populated by the shredding traversal
///
/// One builder serves one shred call; `build` consumes it.
#[derive(Debug)]
pub struct ShreddedDocumentBuilder {
    hasher: DocValueHasher,
    id: DocumentId,
    tx_id: Option<Uuid>,
    doc_json: String,
    exist_keys: BTreeSet<DocPath>,
    sub_doc_equals: Option<BTreeMap<DocPath, ValueDigest>>,
    array_size: Option<BTreeMap<DocPath, usize>>,
    array_equals: Option<BTreeMap<DocPath, ValueDigest>>,
    array_contains: Option<BTreeSet<ArrayContainsKey>>,
    query_bool_values: Option<BTreeMap<DocPath, bool>>,
    query_number_values: Option<BTreeMap<DocPath, Number>>,
    query_text_values: Option<BTreeMap<DocPath, String>>,
    query_null_values: Option<BTreeSet<DocPath>>,
    query_vector_values: Option<BTreeMap<DocPath, Vec<f32>>>,
    query_vectorize_values: Option<BTreeSet<DocPath>>,
}

impl ShreddedDocumentBuilder {
    /// Start accumulating facts for one document
    pub fn new(id: DocumentId, tx_id: Option<Uuid>, doc_json: String) -> Self {
        ShreddedDocumentBuilder {
            hasher: DocValueHasher::new(),
            id,
            tx_id,
            doc_json,
            exist_keys: BTreeSet::new(),
            sub_doc_equals: None,
            array_size: None,
            array_equals: None,
            array_contains: None,
            query_bool_values: None,
            query_number_values: None,
            query_text_values: None,
            query_null_values: None,
            query_vector_values: None,
            query_vectorize_values: None,
        }
    }

    /// Record an object node; returns whether the traversal should descend
    /// into its properties
    pub fn shred_object(&mut self, path: DocPath, value: &Value) -> bool {
        let digest = self.hasher.hash(value);
        self.add_key(path.clone());
        self.sub_doc_equals
            .get_or_insert_with(BTreeMap::new)
            .insert(path, digest);
        true
    }

    /// Record an array node: existence, size, whole-array digest, and one
    /// containment entry per element
    pub fn shred_array(&mut self, path: DocPath, value: &Value, items: &[Value]) {
        let digest = self.hasher.hash(value);
        self.add_key(path.clone());
        self.array_size
            .get_or_insert_with(BTreeMap::new)
            .insert(path.clone(), items.len());
        self.array_equals
            .get_or_insert_with(BTreeMap::new)
            .insert(path.clone(), digest);

        // Containment is keyed by the array's path, not the element index;
        // in-array atomics get their own scalar facts during descent.
        let contains = self.array_contains.get_or_insert_with(BTreeSet::new);
        for item in items {
            let digest = self.hasher.hash(item);
            contains.insert(ArrayContainsKey {
                path: path.clone(),
                digest,
            });
        }
    }

    /// Record a text scalar
    pub fn shred_text(&mut self, path: DocPath, text: &str) {
        self.add_key(path.clone());
        self.query_text_values
            .get_or_insert_with(BTreeMap::new)
            .insert(path, text.to_string());
    }

    /// Record a numeric scalar
    pub fn shred_number(&mut self, path: DocPath, number: &Number) {
        self.add_key(path.clone());
        self.query_number_values
            .get_or_insert_with(BTreeMap::new)
            .insert(path, number.clone());
    }

    /// Record a boolean scalar
    pub fn shred_boolean(&mut self, path: DocPath, value: bool) {
        self.add_key(path.clone());
        self.query_bool_values
            .get_or_insert_with(BTreeMap::new)
            .insert(path, value);
    }

    /// Record an explicit null
    pub fn shred_null(&mut self, path: DocPath) {
        self.add_key(path.clone());
        self.query_null_values
            .get_or_insert_with(BTreeSet::new)
            .insert(path);
    }

    /// Record the reserved vector embedding field
    pub fn shred_vector(&mut self, path: DocPath, vector: Vec<f32>) {
        self.add_key(path.clone());
        self.query_vector_values
            .get_or_insert_with(BTreeMap::new)
            .insert(path, vector);
    }

    /// Record the opaque marker for the reserved vectorize text field
    pub fn shred_vectorize(&mut self, path: DocPath) {
        self.add_key(path.clone());
        self.query_vectorize_values
            .get_or_insert_with(BTreeSet::new)
            .insert(path);
    }

    /// There is an addressable path in the document being shredded: an
    /// atomic document root, an object property, or an array element.
    fn add_key(&mut self, key: DocPath) {
        self.exist_keys.insert(key);
    }

    /// Produce the immutable record once all facts have been collected
    pub fn build(self) -> ShreddedDocument {
        ShreddedDocument {
            id: self.id,
            tx_id: self.tx_id,
            doc_json: self.doc_json,
            exist_keys: self.exist_keys,
            sub_doc_equals: self.sub_doc_equals.unwrap_or_default(),
            array_size: self.array_size.unwrap_or_default(),
            array_equals: self.array_equals.unwrap_or_default(),
            array_contains: self.array_contains.unwrap_or_default(),
            query_bool_values: self.query_bool_values.unwrap_or_default(),
            query_number_values: self.query_number_values.unwrap_or_default(),
            query_text_values: self.query_text_values.unwrap_or_default(),
            query_null_values: self.query_null_values.unwrap_or_default(),
            query_vector_values: self.query_vector_values.unwrap_or_default(),
            query_vectorize_values: self.query_vectorize_values.unwrap_or_default(),
        }
    }
}
