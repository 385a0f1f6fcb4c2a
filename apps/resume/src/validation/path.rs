//! Dotted field paths and the resolver that walks them through a document.
//!
//! A `FieldPath` is parsed once, when a rule is defined, and never re-split
//! on lookup. Segments descend through object keys; a numeric segment
//! applied to an array indexes into it (`experience.0.company`).

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("field path must not be empty")]
    Empty,

    #[error("field path '{0}' contains an empty segment")]
    EmptySegment(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A segment before the last one could not be resolved.
    #[error("'{parent}' is missing or cannot contain fields")]
    MissingParent { parent: String },

    /// Every parent resolved but the final segment did not.
    #[error("field is missing")]
    MissingField,
}

/// A validated, non-empty sequence of path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::EmptySegment(raw.to_string()));
        }
        Ok(Self { segments })
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Appends an array index segment.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(index.to_string());
        Self { segments }
    }

    /// Appends all segments of `other`; used to make entry-relative paths absolute.
    pub fn concat(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Dotted form of the first `len` segments.
    fn prefix(&self, len: usize) -> String {
        self.segments[..len].join(".")
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution
// ────────────────────────────────────────────────────────────────────────────

/// Walks `path` from `root` and returns the terminal value, which may be `null`.
pub fn resolve<'a>(root: &'a Value, path: &FieldPath) -> Result<&'a Value, ResolutionError> {
    let last = path.segments.len() - 1;
    let mut current = root;

    for (depth, segment) in path.segments.iter().enumerate() {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        };

        current = match next {
            Some(value) => value,
            None if depth == last => return Err(ResolutionError::MissingField),
            None => {
                return Err(ResolutionError::MissingParent {
                    parent: path.prefix(depth + 1),
                })
            }
        };
    }

    Ok(current)
}

/// Resolves candidates in priority order; the first one that resolves wins.
///
/// When none resolves, the error of the highest-priority candidate is returned.
pub fn resolve_first<'a, 'p>(
    root: &'a Value,
    candidates: &'p [FieldPath],
) -> Result<(&'p FieldPath, &'a Value), ResolutionError> {
    let mut first_error = None;
    for candidate in candidates {
        match resolve(root, candidate) {
            Ok(value) => return Ok((candidate, value)),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.unwrap_or(ResolutionError::MissingField))
}
