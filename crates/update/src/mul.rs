//! `$mul`: multiply a numeric target by a numeric factor

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::{target, values};
use serde_json::{Map, Number, Value};
use shale_core::{json_type_name, DocPath, Error, Result};

/// A validated `$mul` operation
#[derive(Debug, Clone, PartialEq)]
pub struct MulOperation {
    actions: Vec<MulAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct MulAction {
    path: DocPath,
    factor: Number,
}

impl MulOperation {
    /// Construct from the operator's argument object; every argument must
    /// be a number
    pub fn construct(args: &Map<String, Value>) -> Result<MulOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::Mul, key)?;
            let Value::Number(factor) = arg else {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "$mul requires numeric parameter, instead got: {}",
                        json_type_name(arg)
                    ),
                });
            };
            actions.push(MulAction {
                path,
                factor: factor.clone(),
            });
        }
        Ok(MulOperation {
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Apply to a document; returns whether anything changed
    ///
    /// A missing target is created with the value 0.
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            if target::find_if_exists(doc, &action.path).is_none() {
                target::set_at(doc, &action.path, Value::Number(Number::from(0)), "$mul")?;
                changes = true;
                continue;
            }
            let Some(current) = target::find_if_exists_mut(doc, &action.path) else {
                continue;
            };
            match current {
                Value::Number(current) => {
                    let new = values::mul_numbers(current, &action.factor).ok_or_else(|| {
                        Error::UnsupportedUpdateOperationTarget {
                            message: format!(
                                "$mul result at '{}' is not a representable number",
                                action.path
                            ),
                        }
                    })?;
                    if *current != new {
                        *current = new;
                        changes = true;
                    }
                }
                other => {
                    return Err(Error::UnsupportedUpdateOperationTarget {
                        message: format!(
                            "$mul requires target to be Number; value at '{}' of type {}",
                            action.path,
                            json_type_name(other)
                        ),
                    })
                }
            }
        }
        Ok(changes)
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

    #[test]
    fn test_mul_existing_integer() {
        let oper = MulOperation::construct(&as_map(json!({"count": 3}))).unwrap();
        let mut doc = as_map(json!({"count": 14}));
        assert!(oper.apply(&mut doc).unwrap());
        assert_eq!(Value::Object(doc), json!({"count": 42}));
    }

    #[test]
    fn test_mul_float_factor() {
        let oper = MulOperation::construct(&as_map(json!({"score": 0.5}))).unwrap();
        let mut doc = as_map(json!({"score": 3}));
        assert!(oper.apply(&mut doc).unwrap());
        assert_eq!(Value::Object(doc), json!({"score": 1.5}));
    }

    #[test]
    fn test_mul_missing_target_upserts_zero() {
        let oper = MulOperation::construct(&as_map(json!({"count": 9}))).unwrap();
        let mut doc = as_map(json!({}));
        assert!(oper.apply(&mut doc).unwrap());
        assert_eq!(Value::Object(doc), json!({"count": 0}));
    }

    #[test]
    fn test_mul_by_one_reports_no_change() {
        let oper = MulOperation::construct(&as_map(json!({"count": 1}))).unwrap();
        let mut doc = as_map(json!({"count": 5}));
        assert!(!oper.apply(&mut doc).unwrap());
    }

    #[test]
    fn test_mul_non_number_param_rejected() {
        let err = MulOperation::construct(&as_map(json!({"count": true}))).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_PARAM");
    }

    #[test]
    fn test_mul_non_number_target_rejected() {
        let oper = MulOperation::construct(&as_map(json!({"tags": 2}))).unwrap();
        let mut doc = as_map(json!({"tags": [1, 2]}));
        let err = oper.apply(&mut doc).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_UPDATE_OPERATION_TARGET");
    }
}
