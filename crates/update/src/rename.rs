//! `$rename`: move a value from one path to another
//!
//! The argument names the new path as a string. Array element paths are
//! rejected at construct time for both source and destination; renames
//! address object properties only. A missing source is a silent no-op; an
//! existing destination is overwritten.

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use serde_json::{Map, Value};
use shale_core::{json_type_name, DocPath, Error, PathSegment, Result};

/// A validated `$rename` operation
#[derive(Debug, Clone, PartialEq)]
pub struct RenameOperation {
    actions: Vec<RenameAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct RenameAction {
    from: DocPath,
    to: DocPath,
}

impl RenameOperation {
    /// Construct from the operator's argument object
    pub fn construct(args: &Map<String, Value>) -> Result<RenameOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let from = validate_update_path(UpdateOperator::Rename, key)?;
            let Value::String(new_path) = arg else {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "$rename requires string parameter naming the new path, instead got: {}",
                        json_type_name(arg)
                    ),
                });
            };
            let to = validate_update_path(UpdateOperator::Rename, new_path)?;
            if from == to {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!("$rename cannot rename path '{}' to itself", from),
                });
            }
            reject_index_segments(&from)?;
            reject_index_segments(&to)?;
            actions.push(RenameAction { from, to });
        }
        Ok(RenameOperation {
            actions: sort_by_path(actions, |a| &a.from),
        })
    }

    /// Apply to a document; returns whether anything moved
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            let Some(value) = target::remove_at(doc, &action.from) else {
                continue;
            };
            target::set_at(doc, &action.to, value, "$rename")?;
            changes = true;
        }
        Ok(changes)
    }
}

fn reject_index_segments(path: &DocPath) -> Result<()> {
    if path
        .segments()
        .iter()
        .any(|s| matches!(s, PathSegment::Index(_)))
    {
        return Err(Error::UnsupportedUpdateOperationParam {
            message: format!("$rename does not support array element paths ('{}')", path),
        });
    }
    Ok(())
}
