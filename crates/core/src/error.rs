//! Error types for the document engine
//!
//! Every failure in the engine is typed, carries a stable machine-readable
//! code (see [`Error::code`]) and a human-readable message, and aborts the
//! current shred/update call entirely. There is no local recovery inside the
//! engine; skipping a bad document in a batch is the caller's concern.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document shredding and update operations
///
/// All document-limit failures share a single variant (and code); the
/// distinct conditions differ only in the message, which always reports the
/// offending path/property, the actual value, and the configured limit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Root of a document to shred is not a JSON object
    #[error("document to shred must be a JSON Object, instead got {actual}")]
    BadDocumentType {
        /// Type of the root node actually received
        actual: &'static str,
    },

    /// Malformed document identity or extension wrapper
    #[error("bad type for '_id' property: {message}")]
    BadDocIdType {
        /// What was wrong with the identity value
        message: String,
    },

    /// Invalid or empty property name
    #[error("document key name constraints violated: {message}")]
    DocKeyNameViolation {
        /// Which key failed and why
        message: String,
    },

    /// Extension-tagged object with wrong inner value type
    #[error("invalid Extension JSON value: {message}")]
    BadExtensionValue {
        /// Which tag carried which invalid value
        message: String,
    },

    /// Reserved vector field is not an array of numbers
    #[error("bad $vector value type: {actual}")]
    BadVectorType {
        /// Type of the value actually found
        actual: &'static str,
    },

    /// Reserved vector field is an empty array
    #[error("$vector value can't be empty")]
    BadVectorSize,

    /// Traversal encountered an unsupported value kind
    ///
    /// Defensive only; unreachable for documents produced by a JSON parser.
    #[error("unrecognized JSON node type in input document: {actual}")]
    UnrecognizedNodeType {
        /// Description of the unexpected node
        actual: String,
    },

    /// Any document limit was exceeded (size, depth, path length, array
    /// length, property counts, string length, number length)
    #[error("document limit violation: {message}")]
    DocLimitViolation {
        /// Offending path/property, actual value, and configured limit
        message: String,
    },

    /// Malformed update operator argument, rejected at construct time
    #[error("unsupported update operation parameter: {message}")]
    UnsupportedUpdateOperationParam {
        /// Operator, expected shape, and actual value received
        message: String,
    },

    /// Update operator target has an incompatible runtime type
    #[error("unsupported target JSON value for update operation: {message}")]
    UnsupportedUpdateOperationTarget {
        /// Operator, path, and actual node type
        message: String,
    },
}

impl Error {
    /// Stable machine-readable code for this failure
    ///
    /// Catch sites branch on the code, never on the message text.
    pub fn code(&self) -> &'static str {
        match self {
            Error::BadDocumentType { .. } => "SHRED_BAD_DOCUMENT_TYPE",
            Error::BadDocIdType { .. } => "SHRED_BAD_DOCID_TYPE",
            Error::DocKeyNameViolation { .. } => "SHRED_DOC_KEY_NAME_VIOLATION",
            Error::BadExtensionValue { .. } => "SHRED_BAD_EJSON_VALUE",
            Error::BadVectorType { .. } => "SHRED_BAD_VECTOR_TYPE",
            Error::BadVectorSize => "SHRED_BAD_VECTOR_SIZE",
            Error::UnrecognizedNodeType { .. } => "SHRED_UNRECOGNIZED_NODE_TYPE",
            Error::DocLimitViolation { .. } => "SHRED_DOC_LIMIT_VIOLATION",
            Error::UnsupportedUpdateOperationParam { .. } => "UNSUPPORTED_UPDATE_OPERATION_PARAM",
            Error::UnsupportedUpdateOperationTarget { .. } => {
                "UNSUPPORTED_UPDATE_OPERATION_TARGET"
            }
        }
    }
}

/// Type name of a JSON value, for error messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_bad_document_type() {
        let err = Error::BadDocumentType { actual: "array" };
        let msg = err.to_string();
        assert!(msg.contains("must be a JSON Object"));
        assert!(msg.contains("array"));
    }

    #[test]
    fn test_error_display_doc_limit_violation() {
        let err = Error::DocLimitViolation {
            message: "document depth exceeds maximum allowed (16)".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("document limit violation"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn test_error_display_vector_size() {
        let err = Error::BadVectorSize;
        assert!(err.to_string().contains("can't be empty"));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            Error::BadDocumentType { actual: "null" }.code(),
            "SHRED_BAD_DOCUMENT_TYPE"
        );
        assert_eq!(
            Error::DocLimitViolation {
                message: String::new()
            }
            .code(),
            "SHRED_DOC_LIMIT_VIOLATION"
        );
        assert_eq!(
            Error::UnsupportedUpdateOperationParam {
                message: String::new()
            }
            .code(),
            "UNSUPPORTED_UPDATE_OPERATION_PARAM"
        );
        assert_eq!(
            Error::UnsupportedUpdateOperationTarget {
                message: String::new()
            }
            .code(),
            "UNSUPPORTED_UPDATE_OPERATION_TARGET"
        );
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
        assert_eq!(json_type_name(&serde_json::json!(true)), "boolean");
        assert_eq!(json_type_name(&serde_json::json!(1.5)), "number");
        assert_eq!(json_type_name(&serde_json::json!("x")), "string");
        assert_eq!(json_type_name(&serde_json::json!([])), "array");
        assert_eq!(json_type_name(&serde_json::json!({})), "object");
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
