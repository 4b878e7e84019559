//! `$set`: write a value at a path, creating missing parents

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use serde_json::{Map, Value};
use shale_core::{DocPath, Result};

/// A validated `$set` operation
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    actions: Vec<SetAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct SetAction {
    path: DocPath,
    value: Value,
}

impl SetOperation {
    /// Construct from the operator's argument object; any JSON value is a
    /// valid argument
    pub fn construct(args: &Map<String, Value>) -> Result<SetOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::Set, key)?;
            actions.push(SetAction {
                path,
                value: arg.clone(),
            });
        }
        Ok(SetOperation {
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Apply to a document; returns whether anything changed
    ///
    /// Writing a value equal to the one already present reports no change.
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for action in &self.actions {
            let old = target::set_at(doc, &action.path, action.value.clone(), "$set")?;
            changes |= match old {
                Some(old) => old != action.value,
                None => true,
            };
        }
        Ok(changes)
    }
}
