//! `$pop`: remove the first or last element of an array

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use serde_json::{Map, Value};
use shale_core::{json_type_name, DocPath, Error, Result};

/// A validated `$pop` operation
#[derive(Debug, Clone, PartialEq)]
pub struct PopOperation {
    actions: Vec<PopAction>,
}

/// Per-field pop definition
#[derive(Debug, Clone, PartialEq)]
struct PopAction {
    path: DocPath,
    remove_first: bool,
}

impl PopOperation {
    /// Construct from the operator's argument object
    ///
    /// Each argument must be the number -1 (remove first) or 1 (remove
    /// last); anything else is rejected here.
    pub fn construct(args: &Map<String, Value>) -> Result<PopOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::Pop, key)?;

            let Value::Number(number) = arg else {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "$pop requires NUMBER argument (-1 or 1), instead got: {}",
                        json_type_name(arg)
                    ),
                });
            };
            let remove_first = match number.as_i64() {
                Some(-1) => true,
                Some(1) => false,
                _ => {
                    return Err(Error::UnsupportedUpdateOperationParam {
                        message: format!(
                            "$pop requires argument of -1 or 1, instead got: {}",
                            number
                        ),
                    })
                }
            };
            actions.push(PopAction { path, remove_first });
        }
        Ok(PopOperation {
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Apply to a document; returns whether anything changed
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            // If the target does not exist, nothing to do; not an error.
            let Some(target) = target::find_if_exists_mut(doc, &action.path) else {
                continue;
            };
            match target {
                Value::Array(items) => {
                    // Empty array is a no-op, not an error.
                    if !items.is_empty() {
                        if action.remove_first {
                            items.remove(0);
                        } else {
                            items.pop();
                        }
                        changes = true;
                    }
                }
                other => {
                    return Err(Error::UnsupportedUpdateOperationTarget {
                        message: format!(
                            "$pop requires target to be Array; value at '{}' of type {}",
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
