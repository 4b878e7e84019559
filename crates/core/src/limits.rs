//! Document limits configuration
//!
//! Read-only thresholds enforced by the shredding pipeline. Violations are
//! reported as `DocLimitViolation` with a message naming the offending
//! path/property, the actual value, and the configured limit.
//!
//! The configuration is immutable after construction and safe to share
//! across concurrent shred calls.

/// Structural and value limits for stored documents
#[derive(Debug, Clone)]
pub struct DocumentLimits {
    /// Maximum serialized document size in bytes (default: 4,000,000)
    pub max_size: usize,

    /// Maximum nesting depth (default: 16)
    pub max_depth: usize,

    /// Maximum dotted property path length in characters (default: 1000)
    pub max_property_path_length: usize,

    /// Maximum properties per object (default: 1000)
    pub max_object_properties: usize,

    /// Maximum total indexed properties per document (default: 2000)
    pub max_document_properties: usize,

    /// Maximum elements per indexable array (default: 1000)
    pub max_array_length: usize,

    /// Separate, larger allowance for the reserved vector embedding field
    /// (default: 4096)
    pub max_vector_embedding_length: usize,

    /// Maximum indexed string length in bytes (default: 8000); the reserved
    /// vectorize source-text field is exempt
    pub max_string_bytes: usize,

    /// Maximum textual length of a decimal number (default: 50)
    pub max_number_length: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        DocumentLimits {
            max_size: 4_000_000,
            max_depth: 16,
            max_property_path_length: 1000,
            max_object_properties: 1000,
            max_document_properties: 2000,
            max_array_length: 1000,
            max_vector_embedding_length: 4096,
            max_string_bytes: 8000,
            max_number_length: 50,
        }
    }
}

impl DocumentLimits {
    /// Create limits with small values for testing
    ///
    /// Useful for unit tests that exercise limit enforcement without
    /// building enormous documents.
    pub fn with_small_limits() -> Self {
        DocumentLimits {
            max_size: 100_000,
            max_depth: 8,
            max_property_path_length: 48,
            max_object_properties: 10,
            max_document_properties: 40,
            max_array_length: 10,
            max_vector_embedding_length: 16,
            max_string_bytes: 100,
            max_number_length: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = DocumentLimits::default();
        assert_eq!(limits.max_size, 4_000_000);
        assert_eq!(limits.max_depth, 16);
        assert_eq!(limits.max_property_path_length, 1000);
        assert_eq!(limits.max_object_properties, 1000);
        assert_eq!(limits.max_document_properties, 2000);
        assert_eq!(limits.max_array_length, 1000);
        assert_eq!(limits.max_vector_embedding_length, 4096);
        assert_eq!(limits.max_string_bytes, 8000);
        assert_eq!(limits.max_number_length, 50);
    }

    #[test]
    fn test_small_limits_are_smaller() {
        let small = DocumentLimits::with_small_limits();
        let default = DocumentLimits::default();
        assert!(small.max_array_length < default.max_array_length);
        assert!(small.max_depth < default.max_depth);
        assert!(small.max_vector_embedding_length > small.max_array_length);
    }

    #[test]
    fn test_custom_limits() {
        let limits = DocumentLimits {
            max_array_length: 3,
            ..DocumentLimits::default()
        };
        assert_eq!(limits.max_array_length, 3);
        assert_eq!(limits.max_depth, 16);
    }
}
