//! `$currentDate`: write the current timestamp at a path
//!
//! Accepts `true` or `{"$type": "date"}` as the argument; writes the
//! `{"$date": <epoch millis>}` extension encoding, creating missing
//! parents.

use crate::operator::{sort_by_path, validate_update_path, UpdateOperator};
use crate::target;
use chrono::Utc;
use serde_json::{Map, Number, Value};
use shale_core::{DocPath, Error, ExtensionTag, Result};

/// A validated `$currentDate` operation
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentDateOperation {
    actions: Vec<DocPath>,
}

impl CurrentDateOperation {
    /// Construct from the operator's argument object
    pub fn construct(args: &Map<String, Value>) -> Result<CurrentDateOperation> {
        let mut actions = Vec::with_capacity(args.len());
        for (key, arg) in args {
            let path = validate_update_path(UpdateOperator::CurrentDate, key)?;
            if !valid_argument(arg) {
                return Err(Error::UnsupportedUpdateOperationParam {
                    message: format!(
                        "$currentDate requires argument of true or {{\"$type\": \"date\"}}, instead got: {}",
                        arg
                    ),
                });
            }
            actions.push(path);
        }
        Ok(CurrentDateOperation {
            actions: sort_by_path(actions, |path| path),
        })
    }

    /// Apply to a document; the same timestamp is written at every path
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<bool> {
        let now = Utc::now().timestamp_millis();
        let mut wrapper = Map::with_capacity(1);
        wrapper.insert(
            ExtensionTag::Date.encoded_name().to_string(),
            Value::Number(Number::from(now)),
        );
        let timestamp = Value::Object(wrapper);

        let mut changes = false;
        for path in &self.actions {
            let old = target::set_at(doc, path, timestamp.clone(), "$currentDate")?;
            changes |= old.as_ref() != Some(&timestamp);
        }
        Ok(changes)
    }
}

fn valid_argument(arg: &Value) -> bool {
    match arg {
        Value::Bool(true) => true,
        Value::Object(obj) => {
            obj.len() == 1 && obj.get("$type").and_then(Value::as_str) == Some("date")
        }
        _ => false,
    }
}
