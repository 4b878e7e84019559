//! Target location: navigating a document tree by path
//!
//! Update operators locate their targets with the same path model the
//! shredder indexes by. `Index` segments address arrays positionally; when
//! the container turns out to be an object, the segment falls back to a
//! property lookup by its decimal string (an object key like `"2"` is legal
//! document data).
//!
//! Two navigation modes match the operator contract: `find_if_exists`
//! dead-ends silently when the path is absent (the no-op case), while
//! `set_at` creates missing intermediate containers on behalf of upserting
//! operators, padding arrays with nulls up to the written index.

use serde_json::{Map, Value};
use shale_core::{json_type_name, DocPath, Error, PathSegment, Result};

/// Immutable lookup; `None` when the path does not exist or runs through an
/// incompatible node
pub(crate) fn find_if_exists<'a>(doc: &'a Map<String, Value>, path: &DocPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = doc.get(&segment_key(first))?;
    for segment in rest {
        current = step(current, segment)?;
    }
    Some(current)
}

/// Mutable lookup with the same dead-end semantics as [`find_if_exists`]
pub(crate) fn find_if_exists_mut<'a>(
    doc: &'a mut Map<String, Value>,
    path: &DocPath,
) -> Option<&'a mut Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = doc.get_mut(&segment_key(first))?;
    for segment in rest {
        current = step_mut(current, segment)?;
    }
    Some(current)
}

/// Write `value` at `path`, creating missing intermediate containers
///
/// Returns the previous value at the path, if any. Intermediate containers
/// are objects unless the following segment is an index, in which case an
/// array is created; array writes pad with nulls up to the index. A scalar
/// in the middle of the path is an apply-phase failure attributed to `op`.
pub(crate) fn set_at(
    doc: &mut Map<String, Value>,
    path: &DocPath,
    value: Value,
    op: &'static str,
) -> Result<Option<Value>> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(Error::UnsupportedUpdateOperationParam {
            message: format!("{}: update path must not be empty", op),
        });
    };

    if parents.is_empty() {
        return Ok(doc.insert(segment_key(last), value));
    }

    let next = parents.get(1).unwrap_or(last);
    let mut current = doc
        .entry(segment_key(&parents[0]))
        .or_insert_with(|| empty_container(next));
    for (ix, segment) in parents.iter().enumerate().skip(1) {
        let next = parents.get(ix + 1).unwrap_or(last);
        current = step_or_create(current, segment, next, path, op)?;
    }
    write_last(current, last, value, path, op)
}

/// Remove the value at `path`, without creating anything on the way
///
/// Object properties are removed outright. Array elements are replaced with
/// null rather than shifted, so sibling paths stay stable; replacing a null
/// with a null reports nothing removed. Returns the removed value.
pub(crate) fn remove_at(doc: &mut Map<String, Value>, path: &DocPath) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;

    if parents.is_empty() {
        return doc.remove(&segment_key(last));
    }

    let mut current = doc.get_mut(&segment_key(&parents[0]))?;
    for segment in &parents[1..] {
        current = step_mut(current, segment)?;
    }
    match current {
        Value::Object(map) => map.remove(&segment_key(last)),
        Value::Array(items) => {
            let ix = last.as_index()?;
            let slot = items.get_mut(ix)?;
            let old = std::mem::replace(slot, Value::Null);
            if old == Value::Null {
                None
            } else {
                Some(old)
            }
        }
        _ => None,
    }
}

/// Property name used when a segment addresses an object
fn segment_key(segment: &PathSegment) -> String {
    match segment {
        PathSegment::Property(name) => name.clone(),
        PathSegment::Index(ix) => ix.to_string(),
    }
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), _) => map.get(&segment_key(segment)),
        (Value::Array(items), PathSegment::Index(ix)) => items.get(*ix),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (value, segment) {
        (Value::Object(map), _) => map.get_mut(&segment_key(segment)),
        (Value::Array(items), PathSegment::Index(ix)) => items.get_mut(*ix),
        _ => None,
    }
}

fn empty_container(next: &PathSegment) -> Value {
    match next {
        PathSegment::Property(_) => Value::Object(Map::new()),
        PathSegment::Index(_) => Value::Array(Vec::new()),
    }
}

fn step_or_create<'a>(
    value: &'a mut Value,
    segment: &PathSegment,
    next: &PathSegment,
    path: &DocPath,
    op: &'static str,
) -> Result<&'a mut Value> {
    match value {
        Value::Object(map) => Ok(map
            .entry(segment_key(segment))
            .or_insert_with(|| empty_container(next))),
        Value::Array(items) => {
            let Some(ix) = segment.as_index() else {
                return Err(intermediate_error(op, path, "array"));
            };
            while items.len() < ix {
                items.push(Value::Null);
            }
            if items.len() == ix {
                items.push(empty_container(next));
            } else if !items[ix].is_object() && !items[ix].is_array() {
                return Err(intermediate_error(op, path, json_type_name(&items[ix])));
            }
            Ok(&mut items[ix])
        }
        other => Err(intermediate_error(op, path, json_type_name(other))),
    }
}

fn write_last(
    parent: &mut Value,
    last: &PathSegment,
    value: Value,
    path: &DocPath,
    op: &'static str,
) -> Result<Option<Value>> {
    match parent {
        Value::Object(map) => Ok(map.insert(segment_key(last), value)),
        Value::Array(items) => {
            let Some(ix) = last.as_index() else {
                return Err(intermediate_error(op, path, "array"));
            };
            if ix < items.len() {
                Ok(Some(std::mem::replace(&mut items[ix], value)))
            } else {
                while items.len() < ix {
                    items.push(Value::Null);
                }
                items.push(value);
                Ok(None)
            }
        }
        other => Err(intermediate_error(op, path, json_type_name(other))),
    }
}

fn intermediate_error(op: &'static str, path: &DocPath, found: &str) -> Error {
    Error::UnsupportedUpdateOperationTarget {
        message: format!(
            "{} cannot create field along path '{}'; found intermediate value of type {}",
            op, path, found
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {:?}", other),
        }
    }

    fn path(s: &str) -> DocPath {
        s.parse().unwrap()
    }

    // === find_if_exists ===

    #[test]
    fn test_find_nested_property() {
        let doc = as_map(json!({"a": {"b": {"c": 42}}}));
        assert_eq!(find_if_exists(&doc, &path("a.b.c")), Some(&json!(42)));
    }

    #[test]
    fn test_find_array_element() {
        let doc = as_map(json!({"arr": [10, 20, 30]}));
        assert_eq!(find_if_exists(&doc, &path("arr.1")), Some(&json!(20)));
    }

    #[test]
    fn test_find_numeric_object_key() {
        let doc = as_map(json!({"scores": {"0": "zero"}}));
        assert_eq!(find_if_exists(&doc, &path("scores.0")), Some(&json!("zero")));
    }

    #[test]
    fn test_find_missing_path_is_none() {
        let doc = as_map(json!({"a": 1}));
        assert_eq!(find_if_exists(&doc, &path("b")), None);
        assert_eq!(find_if_exists(&doc, &path("a.b")), None);
    }

    #[test]
    fn test_find_through_scalar_is_none() {
        let doc = as_map(json!({"a": "text"}));
        assert_eq!(find_if_exists(&doc, &path("a.b.c")), None);
    }

    #[test]
    fn test_find_index_out_of_bounds_is_none() {
        let doc = as_map(json!({"arr": [1]}));
        assert_eq!(find_if_exists(&doc, &path("arr.5")), None);
    }

    // === set_at ===

    #[test]
    fn test_set_top_level() {
        let mut doc = as_map(json!({"a": 1}));
        let old = set_at(&mut doc, &path("a"), json!(2), "$set").unwrap();
        assert_eq!(old, Some(json!(1)));
        assert_eq!(Value::Object(doc), json!({"a": 2}));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = as_map(json!({}));
        let old = set_at(&mut doc, &path("a.b.c"), json!(1), "$set").unwrap();
        assert_eq!(old, None);
        assert_eq!(Value::Object(doc), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_creates_array_for_index_segment() {
        let mut doc = as_map(json!({}));
        set_at(&mut doc, &path("a.0"), json!("first"), "$set").unwrap();
        assert_eq!(Value::Object(doc), json!({"a": ["first"]}));
    }

    #[test]
    fn test_set_pads_array_with_nulls() {
        let mut doc = as_map(json!({"a": [1]}));
        set_at(&mut doc, &path("a.3"), json!("x"), "$set").unwrap();
        assert_eq!(Value::Object(doc), json!({"a": [1, null, null, "x"]}));
    }

    #[test]
    fn test_set_replaces_array_element() {
        let mut doc = as_map(json!({"a": [1, 2, 3]}));
        let old = set_at(&mut doc, &path("a.1"), json!(9), "$set").unwrap();
        assert_eq!(old, Some(json!(2)));
        assert_eq!(Value::Object(doc), json!({"a": [1, 9, 3]}));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = as_map(json!({"a": "text"}));
        let err = set_at(&mut doc, &path("a.b"), json!(1), "$set").unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_TARGET");
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_set_numeric_key_into_object() {
        let mut doc = as_map(json!({"scores": {"0": "old"}}));
        set_at(&mut doc, &path("scores.0"), json!("new"), "$set").unwrap();
        assert_eq!(Value::Object(doc), json!({"scores": {"0": "new"}}));
    }

    // === remove_at ===

    #[test]
    fn test_remove_top_level() {
        let mut doc = as_map(json!({"a": 1, "b": 2}));
        assert_eq!(remove_at(&mut doc, &path("a")), Some(json!(1)));
        assert_eq!(Value::Object(doc), json!({"b": 2}));
    }

    #[test]
    fn test_remove_nested() {
        let mut doc = as_map(json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(remove_at(&mut doc, &path("a.b")), Some(json!(1)));
        assert_eq!(Value::Object(doc), json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_remove_array_element_nulls_without_shifting() {
        let mut doc = as_map(json!({"arr": [1, 2, 3]}));
        assert_eq!(remove_at(&mut doc, &path("arr.1")), Some(json!(2)));
        assert_eq!(Value::Object(doc), json!({"arr": [1, null, 3]}));
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut doc = as_map(json!({"a": 1}));
        assert_eq!(remove_at(&mut doc, &path("b")), None);
        assert_eq!(remove_at(&mut doc, &path("a.b")), None);
        assert_eq!(Value::Object(doc), json!({"a": 1}));
    }

    #[test]
    fn test_remove_null_array_element_reports_nothing() {
        let mut doc = as_map(json!({"arr": [null]}));
        assert_eq!(remove_at(&mut doc, &path("arr.0")), None);
    }
}
