//! Path model: canonical addressing of values inside a document
//!
//! A [`DocPath`] is an ordered sequence of segments, each either an object
//! property name or an array index. The canonical string form joins segments
//! with `.`, rendering indices as decimal digits (`prices.0.usd`).
//!
//! [`DocPathBuilder`] is the mutable companion used during traversal: one
//! builder is shared across sibling visits (each `property`/`index` call
//! overwrites the current leaf slot), and descending into a nested object or
//! array hands out a fresh builder anchored at the current path so child
//! traversal cannot corrupt the parent's in-progress state. Every fact the
//! engine emits snapshots the builder into an immutable [`DocPath`] at that
//! instant.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for document path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Paths must contain at least one segment
    #[error("update path must not be empty")]
    Empty,
    /// A `..` or leading/trailing `.` produced an empty segment
    #[error("empty segment in path at position {0}")]
    EmptySegment(usize),
}

/// A single segment in a document path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Object property name
    Property(String),
    /// Array element index
    Index(usize),
}

impl PathSegment {
    /// Property name if this is a property segment
    pub fn as_property(&self) -> Option<&str> {
        match self {
            PathSegment::Property(name) => Some(name),
            PathSegment::Index(_) => None,
        }
    }

    /// Index value if this is an index segment
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Property(_) => None,
            PathSegment::Index(ix) => Some(*ix),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Property(name) => write!(f, "{}", name),
            PathSegment::Index(ix) => write!(f, "{}", ix),
        }
    }
}

/// Immutable path to a value inside a document
///
/// Two paths are equal iff their segment sequences are equal. Paths are
/// totally ordered (derived from the segment sequence), which gives the
/// update engine its deterministic application order and the shredded record
/// its deterministic iteration order.
///
/// # Examples
///
/// ```
/// use shale_core::path::{DocPath, PathSegment};
///
/// let path: DocPath = "prices.0.usd".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.segments()[1], PathSegment::Index(0));
/// assert_eq!(path.to_string(), "prices.0.usd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DocPath {
    segments: Vec<PathSegment>,
}

impl DocPath {
    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        DocPath { segments }
    }

    /// Create a single-property path
    pub fn from_property(name: impl Into<String>) -> Self {
        DocPath {
            segments: vec![PathSegment::Property(name.into())],
        }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment (None if empty)
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Whether this is a top-level path addressing the given property
    pub fn is_top_level_property(&self, name: &str) -> bool {
        self.segments.len() == 1 && self.segments[0].as_property() == Some(name)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DocPath {
    type Err = PathParseError;

    /// Parse a dotted path
    ///
    /// Digit-only segments (without leading zeros) parse as array indices;
    /// everything else is a property name. Index segments are re-interpreted
    /// contextually by consumers when the addressed container turns out to be
    /// an object with a numeric key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }
        let mut segments = Vec::new();
        let mut position = 0;
        for part in s.split('.') {
            if part.is_empty() {
                return Err(PathParseError::EmptySegment(position));
            }
            segments.push(parse_segment(part));
            position += part.len() + 1;
        }
        Ok(DocPath { segments })
    }
}

/// A digit-only run is an index, unless re-rendering would lose leading
/// zeros (an object key like "007" must stay a property name).
fn parse_segment(part: &str) -> PathSegment {
    if part.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(ix) = part.parse::<usize>() {
            if ix.to_string() == part {
                return PathSegment::Index(ix);
            }
        }
    }
    PathSegment::Property(part.to_string())
}

// Serialized as the canonical string form so paths can key JSON maps.
impl Serialize for DocPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

// =============================================================================
// DocPathBuilder
// =============================================================================

/// Mutable path builder shared across sibling visits during traversal
///
/// `property`/`index` overwrite the builder's leaf slot; `build` snapshots
/// the base plus the leaf into an immutable [`DocPath`]. The scope-descent
/// constructors return a new builder anchored at the current path.
///
/// # Examples
///
/// ```
/// use shale_core::path::DocPathBuilder;
///
/// let mut b = DocPathBuilder::root();
/// b.property("items");
/// let mut nested = b.nested_array_builder();
/// nested.index(2);
/// assert_eq!(nested.build().to_string(), "items.2");
/// // Sibling visit reuses the same builder slot:
/// nested.index(3);
/// assert_eq!(nested.build().to_string(), "items.3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocPathBuilder {
    base: SmallVec<[PathSegment; 8]>,
    current: Option<PathSegment>,
}

impl DocPathBuilder {
    /// Builder anchored at the document root
    pub fn root() -> Self {
        DocPathBuilder::default()
    }

    /// Set the current leaf to an object property name
    pub fn property(&mut self, name: impl Into<String>) -> &mut Self {
        self.current = Some(PathSegment::Property(name.into()));
        self
    }

    /// Set the current leaf to an array index
    pub fn index(&mut self, ix: usize) -> &mut Self {
        self.current = Some(PathSegment::Index(ix));
        self
    }

    /// Snapshot the builder's current state into an immutable path
    pub fn build(&self) -> DocPath {
        let mut segments = Vec::with_capacity(self.base.len() + 1);
        segments.extend(self.base.iter().cloned());
        if let Some(current) = &self.current {
            segments.push(current.clone());
        }
        DocPath { segments }
    }

    /// New builder anchored at the current path, for descending into a
    /// nested object
    pub fn nested_object_builder(&self) -> DocPathBuilder {
        self.nested()
    }

    /// New builder anchored at the current path, for descending into a
    /// nested array
    pub fn nested_array_builder(&self) -> DocPathBuilder {
        self.nested()
    }

    fn nested(&self) -> DocPathBuilder {
        let mut base = self.base.clone();
        if let Some(current) = &self.current {
            base.push(current.clone());
        }
        DocPathBuilder {
            base,
            current: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Display / parse ===

    #[test]
    fn test_display_joins_with_dots() {
        let path = DocPath::from_segments(vec![
            PathSegment::Property("user".to_string()),
            PathSegment::Property("scores".to_string()),
            PathSegment::Index(1),
        ]);
        assert_eq!(path.to_string(), "user.scores.1");
    }

    #[test]
    fn test_parse_round_trip() {
        let path: DocPath = "user.scores.1".parse().unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.segments()[2], PathSegment::Index(1));
        assert_eq!(path.to_string(), "user.scores.1");
    }

    #[test]
    fn test_parse_rejects_empty_path() {
        assert_eq!("".parse::<DocPath>(), Err(PathParseError::Empty));
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(matches!(
            "a..b".parse::<DocPath>(),
            Err(PathParseError::EmptySegment(_))
        ));
        assert!(matches!(
            ".a".parse::<DocPath>(),
            Err(PathParseError::EmptySegment(0))
        ));
        assert!("a.".parse::<DocPath>().is_err());
    }

    #[test]
    fn test_parse_leading_zero_is_property() {
        let path: DocPath = "a.007".parse().unwrap();
        assert_eq!(
            path.segments()[1],
            PathSegment::Property("007".to_string())
        );
        assert_eq!(path.to_string(), "a.007");
    }

    // === Equality and ordering ===

    #[test]
    fn test_equality_is_segment_equality() {
        let a: DocPath = "x.0".parse().unwrap();
        let b = DocPath::from_segments(vec![
            PathSegment::Property("x".to_string()),
            PathSegment::Index(0),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_and_property_segments_differ() {
        let by_index = DocPath::from_segments(vec![PathSegment::Index(0)]);
        let by_name = DocPath::from_segments(vec![PathSegment::Property("0".to_string())]);
        assert_ne!(by_index, by_name);
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let mut paths: Vec<DocPath> = ["b", "a.1", "a.0", "a"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["a", "a.0", "a.1", "b"]);
    }

    // === Builder ===

    #[test]
    fn test_builder_root_is_empty() {
        assert!(DocPathBuilder::root().build().is_empty());
    }

    #[test]
    fn test_builder_overwrites_leaf_across_siblings() {
        let mut b = DocPathBuilder::root();
        b.property("first");
        assert_eq!(b.build().to_string(), "first");
        b.property("second");
        assert_eq!(b.build().to_string(), "second");
    }

    #[test]
    fn test_builder_nested_scope_does_not_corrupt_parent() {
        let mut b = DocPathBuilder::root();
        b.property("outer");
        let mut nested = b.nested_object_builder();
        nested.property("inner");
        assert_eq!(nested.build().to_string(), "outer.inner");
        // Parent builder is untouched by the child's visits.
        assert_eq!(b.build().to_string(), "outer");
        b.property("sibling");
        assert_eq!(b.build().to_string(), "sibling");
    }

    #[test]
    fn test_builder_array_indices() {
        let mut b = DocPathBuilder::root();
        b.property("tags");
        let mut elems = b.nested_array_builder();
        for ix in 0..3 {
            elems.index(ix);
            assert_eq!(elems.build().to_string(), format!("tags.{}", ix));
        }
    }

    #[test]
    fn test_builder_snapshots_are_independent() {
        let mut b = DocPathBuilder::root();
        b.property("a");
        let snapshot = b.build();
        b.property("b");
        assert_eq!(snapshot.to_string(), "a");
    }

    // === Serde ===

    #[test]
    fn test_serializes_as_string() {
        let path: DocPath = "a.0.b".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"a.0.b\"");
        let back: DocPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_is_top_level_property() {
        let path: DocPath = "$vector".parse().unwrap();
        assert!(path.is_top_level_property("$vector"));
        let nested: DocPath = "a.$vector".parse().unwrap();
        assert!(!nested.is_top_level_property("$vector"));
    }
}
