//! `$min` / `$max`: keep the smaller or larger of current value and argument
//!
//! Comparison uses the canonical cross-type ordering (see
//! [`values`](crate::values)); a missing target is set to the argument.

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::{target, values};
use serde_json::{Map, Value};
use shale_core::{DocPath, Result};
use std::cmp::Ordering;

/// A validated `$min` or `$max` operation
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxOperation {
    is_max: bool,
    actions: Vec<MinMaxAction>,
}

#[derive(Debug, Clone, PartialEq)]
struct MinMaxAction {
    path: DocPath,
    value: Value,
}

impl MinMaxOperation {
    /// Construct from the operator's argument object; any JSON value is a
    /// valid argument
    pub fn construct(is_max: bool, args: &Map<String, Value>) -> Result<MinMaxOperation> {
        let operator = if is_max {
            UpdateOperator::Max
        } else {
            UpdateOperator::Min
        };
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(operator, key)?;
            actions.push(MinMaxAction {
                path,
                value: arg.clone(),
            });
        }
        Ok(MinMaxOperation {
            is_max,
            actions: sort_by_path(actions, |a| &a.path),
        })
    }

    /// Whether this is a `$max` (as opposed to `$min`) operation
    pub fn is_max(&self) -> bool {
        self.is_max
    }

    /// Apply to a document; returns whether anything changed
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let op = if self.is_max { "$max" } else { "$min" };
        let mut changes = false;
        for action in &self.actions {
            if target::find_if_exists(doc, &action.path).is_none() {
                target::set_at(doc, &action.path, action.value.clone(), op)?;
                changes = true;
                continue;
            }
            let Some(current) = target::find_if_exists_mut(doc, &action.path) else {
                continue;
            };
            let ord = values::compare(&action.value, current);
            let replace = if self.is_max {
                ord == Ordering::Greater
            } else {
                ord == Ordering::Less
            };
            if replace {
                *current = action.value.clone();
                changes = true;
            }
        }
        Ok(changes)
    }
}
