//! `$unset`: remove the value at a path
//!
//! The argument value is ignored by convention (callers usually pass "");
//! only the path matters. Array elements are nulled rather than shifted so
//! sibling element paths stay stable.

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use serde_json::{Map, Value};
use shale_core::{DocPath, Result};

/// A validated `$unset` operation
#[derive(Debug, Clone, PartialEq)]
pub struct UnsetOperation {
    actions: Vec<DocPath>,
}

impl UnsetOperation {
    /// Construct from the operator's argument object
    pub fn construct(args: &Map<String, Value>) -> Result<UnsetOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for key in args.keys() {
            actions.push(validate_update_path(UpdateOperator::Unset, key)?);
        }
        Ok(UnsetOperation {
            actions: sort_by_path(actions, |path| path),
        })
    }

    /// Apply to a document; returns whether anything was removed
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let mut changes = false;
        for path in &self.actions {
            changes |= target::remove_at(doc, path).is_some();
        }
        Ok(changes)
    }
}
