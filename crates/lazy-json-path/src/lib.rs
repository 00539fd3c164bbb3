//! Path expressions for lazy JSON navigation.
//!
//! A path is one or more dot-separated segments. Each segment is an optional
//! bare name followed by zero or more bracketed integer indices:
//!
//! ```text
//! code
//! data.items[0].name
//! [0].a[1][-1]
//! ```
//!
//! Only the first segment may start directly with a bracket (root-level array
//! access). A path is either accepted as a whole or rejected as a whole; a
//! rejected path never yields a partial list of steps.
//!
//! # Example
//!
//! ```
//! use lazy_json_path::{parse_path, format_path, PathStep};
//!
//! let path = parse_path("data.items[0][-1].name").unwrap();
//! assert_eq!(
//!     path.steps(),
//!     &[
//!         PathStep::Key("data".to_string()),
//!         PathStep::Key("items".to_string()),
//!         PathStep::Index(0),
//!         PathStep::Index(-1),
//!         PathStep::Key("name".to_string()),
//!     ]
//! );
//!
//! assert_eq!(format_path(path.steps()).unwrap(), "data.items[0][-1].name");
//! assert!(parse_path("a.[0]").is_err());
//! ```

use thiserror::Error;

pub mod types;
pub use types::{PathStep, SmartPath};

pub mod validate;
pub use validate::{is_representable_key, is_valid_path, validate_path};

/// Errors produced while parsing or formatting a path expression.
///
/// `segment` is the zero-based position of the offending dot-separated
/// segment and `part` is its text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path segment {segment} has ']' without a preceding '[': '{part}'")]
    UnbalancedBracket { segment: usize, part: String },
    #[error("path segment {segment} has an unterminated index: '{part}'")]
    UnterminatedIndex { segment: usize, part: String },
    #[error("path segment {segment} starts with an index but is not the first segment: '{part}'")]
    MisplacedIndex { segment: usize, part: String },
    #[error("path segment {segment} has text between its indices: '{part}'")]
    UnexpectedText { segment: usize, part: String },
    #[error("path segment {segment} has a non-integer index: '{part}'")]
    InvalidIndex { segment: usize, part: String },
    #[error("key cannot be written as a path segment: '{0}'")]
    UnrepresentableKey(String),
}

/// Parse a path expression into navigation steps.
///
/// # Errors
///
/// Returns a [`PathError`] describing the first malformed segment.
///
/// # Example
///
/// ```
/// use lazy_json_path::{parse_path, PathStep};
///
/// let path = parse_path("[0].a").unwrap();
/// assert_eq!(path.steps(), &[PathStep::Index(0), PathStep::Key("a".to_string())]);
///
/// // An empty segment is an empty key.
/// let path = parse_path("a..b").unwrap();
/// assert_eq!(path.len(), 3);
/// ```
pub fn parse_path(path: &str) -> Result<SmartPath, PathError> {
    let mut steps = Vec::new();
    for (segment, part) in path.split('.').enumerate() {
        parse_segment(segment, part, &mut steps)?;
    }
    Ok(SmartPath::from_steps(steps))
}

fn parse_segment(segment: usize, part: &str, steps: &mut Vec<PathStep>) -> Result<(), PathError> {
    let err_part = || part.to_string();

    let open = part.find('[');
    let close = part.find(']');

    let Some(open) = open else {
        if close.is_some() {
            return Err(PathError::UnbalancedBracket { segment, part: err_part() });
        }
        steps.push(PathStep::Key(part.to_string()));
        return Ok(());
    };

    match close {
        None => return Err(PathError::UnterminatedIndex { segment, part: err_part() }),
        Some(close) if close < open => {
            return Err(PathError::UnbalancedBracket { segment, part: err_part() })
        }
        Some(_) => {}
    }

    if open == 0 {
        if segment > 0 {
            return Err(PathError::MisplacedIndex { segment, part: err_part() });
        }
    } else {
        steps.push(PathStep::Key(part[..open].to_string()));
    }

    let mut rest = &part[open..];
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(PathError::UnexpectedText { segment, part: err_part() });
        };
        let Some(end) = inner.find(']') else {
            return Err(PathError::UnterminatedIndex { segment, part: err_part() });
        };
        let index: isize = inner[..end]
            .parse()
            .map_err(|_| PathError::InvalidIndex { segment, part: err_part() })?;
        steps.push(PathStep::Index(index));
        rest = &inner[end + 1..];
    }
    Ok(())
}

/// Format navigation steps back into a path expression.
///
/// Indices attach to the preceding segment (`a[0]`); a leading index is
/// written bare (`[0].a`). An empty step list formats as the empty string,
/// which parses back as a single empty key.
///
/// # Errors
///
/// Returns [`PathError::UnrepresentableKey`] for keys containing `.`, `[`
/// or `]`, which the grammar cannot express.
///
/// # Example
///
/// ```
/// use lazy_json_path::{format_path, PathStep};
///
/// let steps = [PathStep::Index(0), PathStep::Key("a".to_string()), PathStep::Index(2)];
/// assert_eq!(format_path(&steps).unwrap(), "[0].a[2]");
///
/// assert!(format_path(&[PathStep::Key("a.b".to_string())]).is_err());
/// ```
pub fn format_path(steps: &[PathStep]) -> Result<String, PathError> {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        match step {
            PathStep::Key(key) => {
                if !is_representable_key(key) {
                    return Err(PathError::UnrepresentableKey(key.clone()));
                }
                if i > 0 {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathStep::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    Ok(out)
}
