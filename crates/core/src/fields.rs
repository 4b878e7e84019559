//! Reserved field names and property naming rules

/// Document identity property, always the logical first property
pub const DOC_ID: &str = "_id";

/// Reserved top-level field holding the vector embedding array
pub const VECTOR_FIELD: &str = "$vector";

/// Reserved top-level field holding the text the embedding was derived from
pub const VECTORIZE_FIELD: &str = "$vectorize";

/// Whether `key` satisfies the property naming rule: one or more characters
/// from `[A-Za-z0-9_-]`
///
/// The reserved vector fields are permitted at top level despite the leading
/// `$`; that exemption is the validator's concern, not this predicate's.
pub fn is_valid_property_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_property_name("name"));
        assert!(is_valid_property_name("snake_case"));
        assert!(is_valid_property_name("kebab-case"));
        assert!(is_valid_property_name("Mixed09"));
        assert!(is_valid_property_name("0"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_property_name(""));
        assert!(!is_valid_property_name("$vector"));
        assert!(!is_valid_property_name("with space"));
        assert!(!is_valid_property_name("dotted.name"));
        assert!(!is_valid_property_name("päron"));
    }
}
