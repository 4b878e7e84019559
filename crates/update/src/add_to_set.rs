//! `$addToSet`: append to an array unless an equal element is present
//!
//! Element equality is full JSON value equality. Accepts the `$each`
//! modifier; a missing target creates the array.

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use serde_json::{Map, Value};
use shale_core::{json_type_name, DocPath, Error, Result};

/// A validated `$addToSet` operation
#[derive(Debug, Clone, PartialEq)]
pub struct AddToSetOperation {
    actions: Vec<AddToSetAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct AddToSetAction {
    path: DocPath,
    values: Vec<Value>,
}

impl AddToSetOperation {
    /// Construct from the operator's argument object
    pub fn construct(args: &Map<String, Value>) -> Result<AddToSetOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::AddToSet, key)?;
            let values = parse_values(arg)?;
            actions.push(AddToSetAction { path, values });
        }
        Ok(AddToSetOperation {
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Apply to a document; returns whether anything was added
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            if target::find_if_exists(doc, &action.path).is_none() {
                let mut items: Vec<Value> = Vec::with_capacity(action.values.len());
                for value in &action.values {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                target::set_at(doc, &action.path, Value::Array(items), "$addToSet")?;
                changes = true;
                continue;
            }
            let Some(current) = target::find_if_exists_mut(doc, &action.path) else {
                continue;
            };
            match current {
                Value::Array(items) => {
                    for value in &action.values {
                        if !items.contains(value) {
                            items.push(value.clone());
                            changes = true;
                        }
                    }
                }
                other => {
                    return Err(Error::UnsupportedUpdateOperationTarget {
                        message: format!(
                            "$addToSet requires target to be Array; value at '{}' of type {}",
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

fn parse_values(arg: &Value) -> Result<Vec<Value>> {
    let modifiers = match arg {
        Value::Object(obj) if obj.keys().any(|k| k.starts_with('$')) => obj,
        _ => return Ok(vec![arg.clone()]),
    };
    let mut values = None;
    for (key, value) in modifiers {
        match key.as_str() {
            "$each" => {
                let Value::Array(items) = value else {
                    return Err(Error::UnsupportedUpdateOperationParam {
                        message: format!(
                            "$addToSet modifier $each requires Array argument, instead got: {}",
                            json_type_name(value)
                        ),
                    });
                };
                values = Some(items.clone());
            }
            other => {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!("$addToSet only supports the $each modifier; found: {}", other),
                })
            }
        }
    }
    values.ok_or_else(|| Error::UnsupportedUpdateOperationParam {
        message: "$addToSet modifiers require $each".to_string(),
    })
}
