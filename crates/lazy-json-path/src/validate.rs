//! Validation helpers for path expressions.

use crate::{parse_path, PathError};

/// Validate a path expression without keeping its steps.
///
/// # Example
///
/// ```
/// use lazy_json_path::validate_path;
///
/// validate_path("a.b[0]").unwrap();
/// validate_path("a[0").unwrap_err();
/// ```
pub fn validate_path(path: &str) -> Result<(), PathError> {
    parse_path(path).map(|_| ())
}

/// Check whether a path expression is well-formed.
pub fn is_valid_path(path: &str) -> bool {
    validate_path(path).is_ok()
}

/// Check whether an object key can be written as a bare path segment.
///
/// ```
/// use lazy_json_path::is_representable_key;
///
/// assert!(is_representable_key("user_id"));
/// assert!(is_representable_key(""));
/// assert!(!is_representable_key("a.b"));
/// assert!(!is_representable_key("x[0]"));
/// ```
pub fn is_representable_key(key: &str) -> bool {
    !key.contains(['.', '[', ']'])
}
