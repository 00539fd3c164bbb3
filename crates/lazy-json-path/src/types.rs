//! Type definitions for path expressions.

use std::fmt;
use std::str::FromStr;

use crate::{parse_path, PathError};

/// A single navigation step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Descend by object key. When the current node is array-shaped and the
    /// key reads as an integer, navigation treats it as an index instead.
    Key(String),
    /// Descend by array index. Negative values count from the end.
    Index(isize),
}

impl PathStep {
    /// The integer this step addresses when used against an array.
    ///
    /// ```
    /// use lazy_json_path::PathStep;
    ///
    /// assert_eq!(PathStep::Index(-1).as_index(), Some(-1));
    /// assert_eq!(PathStep::Key("3".to_string()).as_index(), Some(3));
    /// assert_eq!(PathStep::Key("x".to_string()).as_index(), None);
    /// ```
    pub fn as_index(&self) -> Option<isize> {
        match self {
            PathStep::Key(key) => key.parse().ok(),
            PathStep::Index(index) => Some(*index),
        }
    }
}

/// A compiled path expression.
///
/// Steps are produced once and are stateless, so one `SmartPath` can be
/// applied to any number of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SmartPath {
    steps: Vec<PathStep>,
}

impl SmartPath {
    /// Parse a path expression. See [`parse_path`](crate::parse_path).
    pub fn parse(path: &str) -> Result<Self, PathError> {
        parse_path(path)
    }

    pub fn from_steps(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<PathStep> {
        self.steps
    }
}

impl FromStr for SmartPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Writes the canonical form. Keys the grammar cannot express are written
/// as-is; use [`format_path`](crate::format_path) to reject them instead.
impl fmt::Display for SmartPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(key) if i > 0 => write!(f, ".{key}")?,
                PathStep::Key(key) => f.write_str(key)?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SmartPath {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl From<Vec<PathStep>> for SmartPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self::from_steps(steps)
    }
}
