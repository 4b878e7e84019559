//! `$inc`: add a numeric delta to a numeric target

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::{target, values};
use serde_json::{Map, Number, Value};
use shale_core::{json_type_name, DocPath, Error, Result};

/// A validated `$inc` operation
#[derive(Debug, Clone, PartialEq)]
pub struct IncOperation {
    actions: Vec<IncAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct IncAction {
    path: DocPath,
    delta: Number,
}

impl IncOperation {
    /// Construct from the operator's argument object; every argument must
    /// be a number
    pub fn construct(args: &Map<String, Value>) -> Result<IncOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::Inc, key)?;
            let Value::Number(delta) = arg else {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "$inc requires numeric parameter, instead got: {}",
                        json_type_name(arg)
                    ),
                });
            };
            actions.push(IncAction {
                path,
                delta: delta.clone(),
            });
        }
        Ok(IncOperation {
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Apply to a document; returns whether anything changed
    ///
    /// A missing target is created with the delta as its value; a zero
    /// delta on an existing number reports no change.
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            if target::find_if_exists(doc, &action.path).is_none() {
                target::set_at(doc, &action.path, Value::Number(action.delta.clone()), "$inc")?;
                changes = true;
                continue;
            }
            let Some(current) = target::find_if_exists_mut(doc, &action.path) else {
                continue;
            };
            match current {
                Value::Number(current) => {
                    let new = values::add_numbers(current, &action.delta).ok_or_else(|| {
                        Error::UnsupportedUpdateOperationTarget {
                            message: format!(
                                "$inc result at '{}' is not a representable number",
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
                            "$inc requires target to be Number; value at '{}' of type {}",
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
