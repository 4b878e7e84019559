//! `$push`: append to an array
//!
//! The argument is either a plain value (append one element) or a modifier
//! object: `{"$each": [...], "$position": n}`. `$position` inserts at the
//! given index (negative counts from the end, out-of-range clamps);
//! `$position` without `$each` and unknown `$`-modifiers are construct-time
//! rejections. A missing target creates the array.

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use serde_json::{Map, Value};
use shale_core::{json_type_name, DocPath, Error, Result};

/// A validated `$push` operation
#[derive(Debug, Clone, PartialEq)]
pub struct PushOperation {
    actions: Vec<PushAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct PushAction {
    path: DocPath,
    values: Vec<Value>,
    position: Option<i64>,
}

impl PushOperation {
    /// Construct from the operator's argument object
    pub fn construct(args: &Map<String, Value>) -> Result<PushOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::Push, key)?;
            actions.push(parse_action(path, arg)?);
        }
        Ok(PushOperation {
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Apply to a document; returns whether anything changed
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            if target::find_if_exists(doc, &action.path).is_none() {
                let mut items = Vec::new();
                insert_values(&mut items, &action.values, action.position);
                target::set_at(doc, &action.path, Value::Array(items), "$push")?;
                changes = true;
                continue;
            }
            let Some(current) = target::find_if_exists_mut(doc, &action.path) else {
                continue;
            };
            match current {
                Value::Array(items) => {
                    if !action.values.is_empty() {
                        insert_values(items, &action.values, action.position);
                        changes = true;
                    }
                }
                other => {
                    return Err(Error::UnsupportedUpdateOperationTarget {
                        message: format!(
                            "$push requires target to be Array; value at '{}' of type {}",
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

/// A modifier object is any object argument with a `$`-prefixed key; plain
/// object values (no `$` keys) push as a single element.
fn parse_action(path: DocPath, arg: &Value) -> Result<PushAction> {
    let modifiers = match arg {
        Value::Object(obj) if obj.keys().any(|k| k.starts_with('$')) => obj,
        _ => {
            return Ok(PushAction {
                path,
                values: vec![arg.clone()],
                position: None,
            })
        }
    };

    let mut values = None;
    let mut position = None;
    for (key, value) in modifiers {
        match key.as_str() {
            "$each" => {
                let Value::Array(items) = value else {
                    return Err(Error::UnsupportedUpdateOperationParam {
                        message: format!(
                            "$push modifier $each requires Array argument, instead got: {}",
                            json_type_name(value)
                        ),
                    });
                };
                values = Some(items.clone());
            }
            "$position" => {
                let Some(ix) = value.as_i64() else {
                    return Err(Error::UnsupportedUpdateOperationParam {
                        message: format!(
                            "$push modifier $position requires integer argument, instead got: {}",
                            value
                        ),
                    });
                };
                position = Some(ix);
            }
            other => {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!("$push only supports $each and $position modifiers; found: {}", other),
                })
            }
        }
    }

    let Some(values) = values else {
        return Err(Error::UnsupportedUpdateOperationParam {
            message: "$push modifiers require $each".to_string(),
        });
    };
    Ok(PushAction {
        path,
        values,
        position,
    })
}

fn insert_values(items: &mut Vec<Value>, values: &[Value], position: Option<i64>) {
    let ix = match position {
        None => items.len(),
        Some(p) if p >= 0 => (p as usize).min(items.len()),
        Some(p) => items.len().saturating_sub(p.unsigned_abs() as usize),
    };
    for (offset, value) in values.iter().enumerate() {
        items.insert(ix + offset, value.clone());
    }
}
