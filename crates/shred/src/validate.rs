//! Document validators
//!
//! Two passes with different scopes:
//!
//! - [`FullDocValidator`] runs over the full document before any pruning:
//!   nesting depth, property naming rules, cumulative path length, and the
//!   extension-wrapper shape check.
//! - [`IndexableValueValidator`] runs over the (possibly pruned) indexable
//!   copy: per-object property counts, the running document-wide property
//!   total, array lengths (the reserved vector field gets its own larger
//!   cap), string byte lengths (the vectorize source text is exempt), and
//!   decimal number textual length.
//!
//! Every limit message names the offending path/property, the actual value,
//! and the configured limit.

use serde_json::{Map, Number, Value};
use shale_core::{fields, json_type_name, DocumentLimits, Error, ExtensionTag, Result};

/// Validator applied to the full document, before removing non-indexable
/// properties
pub(crate) struct FullDocValidator<'a> {
    limits: &'a DocumentLimits,
}

impl<'a> FullDocValidator<'a> {
    pub(crate) fn new(limits: &'a DocumentLimits) -> Self {
        FullDocValidator { limits }
    }

    pub(crate) fn validate(&self, doc: &Map<String, Value>) -> Result<()> {
        self.validate_object(doc, 0, 0)
    }

    fn validate_value(&self, value: &Value, depth: usize, parent_path_len: usize) -> Result<()> {
        match value {
            Value::Object(map) => self.validate_object(map, depth, parent_path_len),
            Value::Array(items) => self.validate_array(items, depth, parent_path_len),
            _ => Ok(()),
        }
    }

    fn validate_array(&self, items: &[Value], depth: usize, parent_path_len: usize) -> Result<()> {
        let depth = depth + 1;
        self.validate_depth(depth)?;

        // Array length limits apply to the indexable copy only, not here.
        for item in items {
            self.validate_value(item, depth, parent_path_len)?;
        }
        Ok(())
    }

    fn validate_object(
        &self,
        map: &Map<String, Value>,
        depth: usize,
        parent_path_len: usize,
    ) -> Result<()> {
        let depth = depth + 1;
        self.validate_depth(depth)?;

        // Extension JSON types are typed scalars, not structure: a
        // single-property object with a recognized tag is not descended
        // into. Detailed validation happens during identity parsing.
        if map.len() == 1 {
            if let Some((key, inner)) = map.iter().next() {
                if let Some(tag) = ExtensionTag::from_encoded_name(key) {
                    return if inner.is_string() || inner.is_i64() || inner.is_u64() {
                        Ok(())
                    } else {
                        Err(Error::BadExtensionValue {
                            message: format!(
                                "type '{}' has invalid JSON value of type {}",
                                tag,
                                json_type_name(inner)
                            ),
                        })
                    };
                }
            }
        }

        for (key, value) in map {
            // Doc id validation is done during identity normalization; skip
            // here so extension-wrapped ids pass the name-pattern check.
            if depth == 1 && key == fields::DOC_ID {
                continue;
            }
            self.validate_object_key(key, depth, parent_path_len)?;
            let prop_path_len = parent_path_len + 1 + key.len();
            self.validate_value(value, depth, prop_path_len)?;
        }
        Ok(())
    }

    fn validate_object_key(&self, key: &str, depth: usize, parent_path_len: usize) -> Result<()> {
        if key.is_empty() {
            // Validity failure, not a size limit.
            return Err(Error::DocKeyNameViolation {
                message: "empty names not allowed".to_string(),
            });
        }
        if !fields::is_valid_property_name(key) {
            let reserved_at_top = depth == 1
                && (key == fields::VECTOR_FIELD || key == fields::VECTORIZE_FIELD);
            if !reserved_at_top {
                return Err(Error::DocKeyNameViolation {
                    message: format!(
                        "field name ('{}') contains invalid character(s), can contain only letters (a-z/A-Z), numbers (0-9), underscores (_), and hyphens (-)",
                        key
                    ),
                });
            }
        }
        let total_path_len = parent_path_len + key.len();
        if total_path_len > self.limits.max_property_path_length {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "property path length ({}) exceeds maximum allowed ({}) (path ends with '{}')",
                    total_path_len, self.limits.max_property_path_length, key
                ),
            });
        }
        Ok(())
    }

    fn validate_depth(&self, depth: usize) -> Result<()> {
        if depth > self.limits.max_depth {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "document depth exceeds maximum allowed ({})",
                    self.limits.max_depth
                ),
            });
        }
        Ok(())
    }
}

/// Secondary validator applied to the indexable document after non-indexed
/// branches have been pruned
pub(crate) struct IndexableValueValidator<'a> {
    limits: &'a DocumentLimits,
    total_properties: usize,
}

impl<'a> IndexableValueValidator<'a> {
    pub(crate) fn new(limits: &'a DocumentLimits) -> Self {
        IndexableValueValidator {
            limits,
            total_properties: 0,
        }
    }

    pub(crate) fn validate(mut self, doc: &Value) -> Result<()> {
        self.validate_value(None, doc)?;
        if self.total_properties > self.limits.max_document_properties {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "total number of indexed properties ({}) in document exceeds maximum allowed ({})",
                    self.total_properties, self.limits.max_document_properties
                ),
            });
        }
        Ok(())
    }

    fn validate_value(&mut self, referring: Option<&str>, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => self.validate_object(referring, map),
            Value::Array(items) => self.validate_array(referring, items),
            Value::String(s) => self.validate_string(referring, s),
            Value::Number(n) => self.validate_number(referring, n),
            _ => Ok(()),
        }
    }

    fn validate_object(&mut self, referring: Option<&str>, map: &Map<String, Value>) -> Result<()> {
        if map.len() > self.limits.max_object_properties {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "number of properties an indexable Object (property '{}') has ({}) exceeds maximum allowed ({})",
                    referring.unwrap_or("<root>"),
                    map.len(),
                    self.limits.max_object_properties
                ),
            });
        }
        self.total_properties += map.len();

        for (key, value) in map {
            self.validate_value(Some(key.as_str()), value)?;
        }
        Ok(())
    }

    fn validate_array(&mut self, referring: Option<&str>, items: &[Value]) -> Result<()> {
        if items.len() > self.limits.max_array_length {
            // One special case: vector embeddings allow a larger size.
            if referring == Some(fields::VECTOR_FIELD) {
                if items.len() > self.limits.max_vector_embedding_length {
                    return Err(Error::DocLimitViolation {
                        message: format!(
                            "number of elements Vector embedding (property '{}') has ({}) exceeds maximum allowed ({})",
                            fields::VECTOR_FIELD,
                            items.len(),
                            self.limits.max_vector_embedding_length
                        ),
                    });
                }
            } else {
                return Err(Error::DocLimitViolation {
                    message: format!(
                        "number of elements an indexable Array (property '{}') has ({}) exceeds maximum allowed ({})",
                        referring.unwrap_or("<root>"),
                        items.len(),
                        self.limits.max_array_length
                    ),
                });
            }
        }

        for item in items {
            self.validate_value(referring, item)?;
        }
        Ok(())
    }

    fn validate_string(&self, referring: Option<&str>, value: &str) -> Result<()> {
        // The vectorize source text is stored opaquely, never indexed, and
        // is exempt from the string length limit.
        if referring == Some(fields::VECTORIZE_FIELD) {
            return Ok(());
        }
        if value.len() > self.limits.max_string_bytes {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "indexed String value (property '{}') length ({} bytes) exceeds maximum allowed ({} bytes)",
                    referring.unwrap_or("<root>"),
                    value.len(),
                    self.limits.max_string_bytes
                ),
            });
        }
        Ok(())
    }

    fn validate_number(&self, referring: Option<&str>, value: &Number) -> Result<()> {
        let text = value.to_string();
        if text.len() > self.limits.max_number_length {
            return Err(Error::DocLimitViolation {
                message: format!(
                    "indexed Number value (property '{}') length ({} chars) exceeds maximum allowed ({})",
                    referring.unwrap_or("<root>"),
                    text.len(),
                    self.limits.max_number_length
                ),
            });
        }
        Ok(())
    }
}
