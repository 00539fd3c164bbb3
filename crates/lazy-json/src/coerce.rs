//! Scalar coercion over raw JSON text.
//!
//! Every `try_*` function returns the coerced value together with a flag
//! telling whether the text really was of that type. On failure the value
//! is the type's zero.

/// Number text of `raw`, with one pair of surrounding quotes removed so
/// quoted numbers coerce like bare ones. `None` when there is nothing left.
fn number_text(raw: &[u8]) -> Option<&str> {
    let raw = match raw {
        [b'"', inner @ .., b'"'] => inner,
        _ => raw,
    };
    if raw.is_empty() {
        return None;
    }
    std::str::from_utf8(raw).ok()
}

fn is_number_literal(raw: &[u8]) -> bool {
    matches!(raw.first(), Some(b'-' | b'0'..=b'9'))
}

pub fn is_null(raw: &[u8]) -> bool {
    raw == b"null"
}

pub fn is_bool(raw: &[u8]) -> bool {
    raw == b"true" || raw == b"false"
}

/// A number literal, or a string whose content parses as a number.
pub fn is_number(raw: &[u8]) -> bool {
    if is_number_literal(raw) {
        return true;
    }
    raw.first() == Some(&b'"') && (try_float(raw).1 || is_int(raw) || is_uint(raw))
}

/// Parse as `i64`, falling back to a float and truncating toward zero.
pub fn try_int(raw: &[u8]) -> (i64, bool) {
    let Some(s) = number_text(raw) else {
        return (0, false);
    };
    if let Ok(n) = s.parse::<i64>() {
        return (n, true);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => (f.trunc() as i64, true),
        _ => (0, false),
    }
}

/// Like [`try_int`], but anything with a leading `-` is rejected.
pub fn try_uint(raw: &[u8]) -> (u64, bool) {
    let Some(s) = number_text(raw) else {
        return (0, false);
    };
    if s.starts_with('-') {
        return (0, false);
    }
    if let Ok(n) = s.parse::<u64>() {
        return (n, true);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => (f.trunc() as u64, true),
        _ => (0, false),
    }
}

pub fn try_float(raw: &[u8]) -> (f64, bool) {
    match number_text(raw).map(str::parse::<f64>) {
        Some(Ok(f)) if f.is_finite() => (f, true),
        _ => (0.0, false),
    }
}

/// Strict integer check: unlike [`try_int`], floats do not count.
pub fn is_int(raw: &[u8]) -> bool {
    number_text(raw).is_some_and(|s| s.parse::<i64>().is_ok())
}

pub fn is_uint(raw: &[u8]) -> bool {
    number_text(raw).is_some_and(|s| !s.starts_with('-') && s.parse::<u64>().is_ok())
}

pub fn is_float(raw: &[u8]) -> bool {
    try_float(raw).1
}

/// Boolean spellings accepted inside strings.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Coerce to a boolean.
///
/// `len` is the value's length as reported by `Json::len`; it decides the
/// result for containers and absent values, which are never exact.
pub fn try_bool(raw: &[u8], len: usize) -> (bool, bool) {
    match raw {
        b"true" => return (true, true),
        b"false" => return (false, true),
        b"null" => return (false, false),
        _ => {}
    }
    if raw.first() == Some(&b'"') {
        let content: String = serde_json::from_slice(raw).unwrap_or_default();
        return match parse_bool_str(&content) {
            Some(b) => (b, true),
            None => (!content.is_empty(), false),
        };
    }
    if is_number_literal(raw) {
        let (f, ok) = try_float(raw);
        if ok {
            return (f != 0.0, true);
        }
    }
    (len != 0, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_int() {
        assert_eq!(try_int(b"12"), (12, true));
        assert_eq!(try_int(b"-7"), (-7, true));
        assert_eq!(try_int(b"\"33\""), (33, true));
        assert_eq!(try_int(b"3.9"), (3, true));
        assert_eq!(try_int(b"-3.9"), (-3, true));
        assert_eq!(try_int(b"1e2"), (100, true));
        assert_eq!(try_int(b"\"abc\""), (0, false));
        assert_eq!(try_int(b"{}"), (0, false));
        assert_eq!(try_int(b""), (0, false));
    }

    #[test]
    fn test_try_uint_rejects_negative() {
        assert_eq!(try_uint(b"18446744073709551615"), (u64::MAX, true));
        assert_eq!(try_uint(b"-1"), (0, false));
        assert_eq!(try_uint(b"\"-0\""), (0, false));
        assert_eq!(try_uint(b"2.5"), (2, true));
    }

    #[test]
    fn test_is_int_is_strict() {
        assert!(is_int(b"123"));
        assert!(is_int(b"\"-123\""));
        assert!(!is_int(b"-1.23"));
        assert!(!is_int(b"1e3"));
        assert!(!is_int(b"\"\""));
        assert!(is_uint(b"7"));
        assert!(!is_uint(b"-7"));
    }

    #[test]
    fn test_try_float() {
        assert_eq!(try_float(b"1.5"), (1.5, true));
        assert_eq!(try_float(b"\"2\""), (2.0, true));
        assert_eq!(try_float(b"true"), (0.0, false));
    }

    #[test]
    fn test_is_number() {
        assert!(is_number(b"0"));
        assert!(is_number(b"-1.5e3"));
        assert!(is_number(b"\"42\""));
        assert!(!is_number(b"\"x\""));
        assert!(!is_number(b"null"));
        assert!(!is_number(b"[1]"));
    }

    #[test]
    fn test_bool_truth_table() {
        let cases = [
            ("true", 0, (true, true)),
            ("false", 0, (false, true)),
            ("null", 0, (false, false)),
            (r#""1""#, 1, (true, true)),
            (r#""t""#, 1, (true, true)),
            (r#""TRUE""#, 4, (true, true)),
            (r#""True""#, 4, (true, true)),
            (r#""0""#, 1, (false, true)),
            (r#""F""#, 1, (false, true)),
            (r#""False""#, 5, (false, true)),
            (r#""yes""#, 3, (true, false)),
            (r#""""#, 0, (false, false)),
            ("0", 0, (false, true)),
            ("-0.0", 0, (false, true)),
            ("-2.5", 0, (true, true)),
            (r#"{"a":1}"#, 1, (true, false)),
            ("[]", 0, (false, false)),
            ("", 0, (false, false)),
        ];
        for (raw, len, expected) in cases {
            assert_eq!(try_bool(raw.as_bytes(), len), expected, "{raw}");
        }
    }
}
