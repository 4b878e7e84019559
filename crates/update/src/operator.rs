//! Update operator registry and clause parsing
//!
//! Every operator follows the same three-phase contract:
//!
//! 1. Construct: each `(path, argument)` pair in the operator's definition
//!    is validated (well-formed path, operator-specific argument shape);
//!    failures raise `UnsupportedUpdateOperationParam`. Actions are sorted
//!    by path for a deterministic application order.
//! 2. Apply: each action locates its target. A missing path is a silent
//!    no-op unless the operator upserts; an incompatible target type raises
//!    `UnsupportedUpdateOperationTarget`.
//! 3. The apply phase reports whether anything changed, so the dispatch
//!    layer can short-circuit "no documents modified" responses.

use crate::add_to_set::AddToSetOperation;
use crate::current_date::CurrentDateOperation;
use crate::inc::IncOperation;
use crate::min_max::MinMaxOperation;
use crate::mul::MulOperation;
use crate::pop::PopOperation;
use crate::push::PushOperation;
use crate::rename::RenameOperation;
use crate::set::SetOperation;
use crate::unset::UnsetOperation;
use serde_json::{Map, Value};
use shale_core::{json_type_name, DocPath, Error, PathSegment, Result};
use tracing::debug;

/// The supported update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    /// `$set`: write a value at a path, creating missing parents
    Set,
    /// `$unset`: remove the value at a path
    Unset,
    /// `$inc`: add a numeric delta
    Inc,
    /// `$mul`: multiply by a numeric factor
    Mul,
    /// `$min`: keep the smaller of current and argument
    Min,
    /// `$max`: keep the larger of current and argument
    Max,
    /// `$pop`: remove the first or last array element
    Pop,
    /// `$push`: append to an array (`$each`/`$position` modifiers)
    Push,
    /// `$addToSet`: append to an array unless already present
    AddToSet,
    /// `$rename`: move a value to a new path
    Rename,
    /// `$currentDate`: write the current timestamp
    CurrentDate,
}

impl UpdateOperator {
    /// The operator's API name, `$`-prefixed
    pub fn api_name(&self) -> &'static str {
        match self {
            UpdateOperator::Set => "$set",
            UpdateOperator::Unset => "$unset",
            UpdateOperator::Inc => "$inc",
            UpdateOperator::Mul => "$mul",
            UpdateOperator::Min => "$min",
            UpdateOperator::Max => "$max",
            UpdateOperator::Pop => "$pop",
            UpdateOperator::Push => "$push",
            UpdateOperator::AddToSet => "$addToSet",
            UpdateOperator::Rename => "$rename",
            UpdateOperator::CurrentDate => "$currentDate",
        }
    }

    /// Look up an operator by its API name
    pub fn from_api_name(name: &str) -> Option<UpdateOperator> {
        match name {
            "$set" => Some(UpdateOperator::Set),
            "$unset" => Some(UpdateOperator::Unset),
            "$inc" => Some(UpdateOperator::Inc),
            "$mul" => Some(UpdateOperator::Mul),
            "$min" => Some(UpdateOperator::Min),
            "$max" => Some(UpdateOperator::Max),
            "$pop" => Some(UpdateOperator::Pop),
            "$push" => Some(UpdateOperator::Push),
            "$addToSet" => Some(UpdateOperator::AddToSet),
            "$rename" => Some(UpdateOperator::Rename),
            "$currentDate" => Some(UpdateOperator::CurrentDate),
            _ => None,
        }
    }

    /// Construct a validated operation from this operator's argument object
    pub fn resolve_operation(&self, args: &Map<String, Value>) -> Result<UpdateOperation> {
        Ok(match self {
            UpdateOperator::Set => UpdateOperation::Set(SetOperation::construct(args)?),
            UpdateOperator::Unset => UpdateOperation::Unset(UnsetOperation::construct(args)?),
            UpdateOperator::Inc => UpdateOperation::Inc(IncOperation::construct(args)?),
            UpdateOperator::Mul => UpdateOperation::Mul(MulOperation::construct(args)?),
            UpdateOperator::Min => {
                UpdateOperation::MinMax(MinMaxOperation::construct(false, args)?)
            }
            UpdateOperator::Max => {
                UpdateOperation::MinMax(MinMaxOperation::construct(true, args)?)
            }
            UpdateOperator::Pop => UpdateOperation::Pop(PopOperation::construct(args)?),
            UpdateOperator::Push => UpdateOperation::Push(PushOperation::construct(args)?),
            UpdateOperator::AddToSet => {
                UpdateOperation::AddToSet(AddToSetOperation::construct(args)?)
            }
            UpdateOperator::Rename => UpdateOperation::Rename(RenameOperation::construct(args)?),
            UpdateOperator::CurrentDate => {
                UpdateOperation::CurrentDate(CurrentDateOperation::construct(args)?)
            }
        })
    }
}

/// One validated, immutable update operation ready to apply
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperation {
    /// A `$set` operation
    Set(SetOperation),
    /// An `$unset` operation
    Unset(UnsetOperation),
    /// An `$inc` operation
    Inc(IncOperation),
    /// A `$mul` operation
    Mul(MulOperation),
    /// A `$min` or `$max` operation
    MinMax(MinMaxOperation),
    /// A `$pop` operation
    Pop(PopOperation),
    /// A `$push` operation
    Push(PushOperation),
    /// An `$addToSet` operation
    AddToSet(AddToSetOperation),
    /// A `$rename` operation
    Rename(RenameOperation),
    /// A `$currentDate` operation
    CurrentDate(CurrentDateOperation),
}

impl UpdateOperation {
    /// Apply this operation to a document, mutating it in place
    ///
    /// Returns whether any change occurred. Callers must own an exclusive
    /// copy of the tree.
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        match self {
            UpdateOperation::Set(op) => op.apply(doc),
            UpdateOperation::Unset(op) => op.apply(doc),
            UpdateOperation::Inc(op) => op.apply(doc),
            UpdateOperation::Mul(op) => op.apply(doc),
            UpdateOperation::MinMax(op) => op.apply(doc),
            UpdateOperation::Pop(op) => op.apply(doc),
            UpdateOperation::Push(op) => op.apply(doc),
            UpdateOperation::AddToSet(op) => op.apply(doc),
            UpdateOperation::Rename(op) => op.apply(doc),
            UpdateOperation::CurrentDate(op) => op.apply(doc),
        }
    }

    /// Which operator this operation was constructed from
    pub fn operator(&self) -> UpdateOperator {
        match self {
            UpdateOperation::Set(_) => UpdateOperator::Set,
            UpdateOperation::Unset(_) => UpdateOperator::Unset,
            UpdateOperation::Inc(_) => UpdateOperator::Inc,
            UpdateOperation::Mul(_) => UpdateOperator::Mul,
            UpdateOperation::MinMax(op) => {
                if op.is_max() {
                    UpdateOperator::Max
                } else {
                    UpdateOperator::Min
                }
            }
            UpdateOperation::Pop(_) => UpdateOperator::Pop,
            UpdateOperation::Push(_) => UpdateOperator::Push,
            UpdateOperation::AddToSet(_) => UpdateOperator::AddToSet,
            UpdateOperation::Rename(_) => UpdateOperator::Rename,
            UpdateOperation::CurrentDate(_) => UpdateOperator::CurrentDate,
        }
    }
}

/// A full update definition: one operation per operator key
///
/// Parsed from the familiar shape `{"$set": {...}, "$pop": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateClause {
    operations: Vec<UpdateOperation>,
}

impl UpdateClause {
    /// Parse and validate a full update definition
    pub fn from_json(update_def: &Value) -> Result<UpdateClause> {
        let Value::Object(map) = update_def else {
            return Err(Error::UnsupportedUpdateOperationParam {
                message: format!(
                    "update clause must be a JSON object, instead got {}",
                    json_type_name(update_def)
                ),
            });
        };
        let mut operations = Vec::with_capacity(map.len());
        for (key, args) in map {
            let Some(operator) = UpdateOperator::from_api_name(key) else {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!("unrecognized update operator: '{}'", key),
                });
            };
            let Value::Object(args_map) = args else {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "{} requires an object argument, instead got {}",
                        operator.api_name(),
                        json_type_name(args)
                    ),
                });
            };
            operations.push(operator.resolve_operation(args_map)?);
        }
        Ok(UpdateClause { operations })
    }

    /// The validated operations, in definition order
    pub fn operations(&self) -> &[UpdateOperation] {
        &self.operations
    }

    /// Apply every operation to the document
    ///
    /// Returns whether any operation changed anything.
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        debug!(
            target: "shale::update",
            operations = self.operations.len(),
            "applying update clause"
        );
        let mut changed = false;
        for operation in &self.operations {
            changed |= operation.apply(doc)?;
        }
        Ok(changed)
    }
}

// =============================================================================
// Shared construct-phase helpers
// =============================================================================

/// Validate one update path at construct time
///
/// Rejects malformed paths and paths addressing `$`-prefixed (operator-like)
/// fields, attributing the failure to `operator`.
pub(crate) fn validate_update_path(operator: UpdateOperator, raw: &str) -> Result<DocPath> {
    let path: DocPath = raw.parse().map_err(|e| Error::UnsupportedUpdateOperationParam {
        message: format!("{}: invalid update path '{}' ({})", operator.api_name(), raw, e),
    })?;
    for segment in path.segments() {
        if let PathSegment::Property(name) = segment {
            if name.starts_with('$') {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "{}: update path cannot address operator-like field '{}'",
                        operator.api_name(),
                        name
                    ),
                });
            }
        }
    }
    Ok(path)
}

/// Sort per-path actions for a deterministic application order
pub(crate) fn sort_by_path<A>(mut actions: Vec<A>, path_of: impl Fn(&A) -> &DocPath) -> Vec<A> {
    actions.sort_by(|a, b| path_of(a).cmp(path_of(b)));
    actions
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

    // === Registry ===

    #[test]
    fn test_api_names_round_trip() {
        for op in [
            UpdateOperator::Set,
            UpdateOperator::Unset,
            UpdateOperator::Inc,
            UpdateOperator::Mul,
            UpdateOperator::Min,
            UpdateOperator::Max,
            UpdateOperator::Pop,
            UpdateOperator::Push,
            UpdateOperator::AddToSet,
            UpdateOperator::Rename,
            UpdateOperator::CurrentDate,
        ] {
            assert_eq!(UpdateOperator::from_api_name(op.api_name()), Some(op));
        }
    }

    #[test]
    fn test_unknown_operator_not_resolved() {
        assert_eq!(UpdateOperator::from_api_name("$setOnInsert"), None);
        assert_eq!(UpdateOperator::from_api_name("set"), None);
    }

    // === Path validation ===

    #[test]
    fn test_valid_update_path() {
        let path = validate_update_path(UpdateOperator::Set, "a.b.0").unwrap();
        assert_eq!(path.to_string(), "a.b.0");
    }

    #[test]
    fn test_empty_update_path_rejected() {
        let err = validate_update_path(UpdateOperator::Set, "").unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_PARAM");
        assert!(err.to_string().contains("$set"));
    }

    #[test]
    fn test_operator_like_path_rejected() {
        let err = validate_update_path(UpdateOperator::Set, "a.$vector").unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_PARAM");
        assert!(err.to_string().contains("$vector"));
    }

    // === Clause parsing ===

    #[test]
    fn test_clause_parses_multiple_operators() {
        let clause = UpdateClause::from_json(&json!({
            "$set": {"name": "x"},
            "$pop": {"tags": 1}
        }))
        .unwrap();
        assert_eq!(clause.operations().len(), 2);
        assert_eq!(clause.operations()[0].operator(), UpdateOperator::Set);
        assert_eq!(clause.operations()[1].operator(), UpdateOperator::Pop);
    }

    #[test]
    fn test_clause_rejects_unknown_operator() {
        let err = UpdateClause::from_json(&json!({"$bogus": {"a": 1}})).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_PARAM");
        assert!(err.to_string().contains("$bogus"));
    }

    #[test]
    fn test_clause_rejects_non_object_definition() {
        let err = UpdateClause::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_PARAM");
    }

    #[test]
    fn test_clause_rejects_non_object_operator_args() {
        let err = UpdateClause::from_json(&json!({"$set": 1})).unwrap_err();
        assert!(err.to_string().contains("$set"));
    }

    #[test]
    fn test_clause_apply_combines_changes() {
        let clause = UpdateClause::from_json(&json!({
            "$set": {"name": "x"},
            "$pop": {"missing": 1}
        }))
        .unwrap();
        let mut doc = as_map(json!({"a": 1}));
        assert!(clause.apply(&mut doc).unwrap());
        assert_eq!(Value::Object(doc), json!({"a": 1, "name": "x"}));
    }

    #[test]
    fn test_clause_apply_no_change() {
        let clause = UpdateClause::from_json(&json!({"$pop": {"missing": 1}})).unwrap();
        let mut doc = as_map(json!({"a": 1}));
        assert!(!clause.apply(&mut doc).unwrap());
    }
}
