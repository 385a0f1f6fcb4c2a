//! Declarative validation rules and the single-rule check.

use serde_json::Value;

use crate::document::NodeKind;
use crate::validation::path::{resolve, resolve_first, FieldPath, PathError, ResolutionError};
use crate::validation::report::{FailureKind, RuleTarget, ValidationError};

pub const DEFAULT_MIN_ITEMS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Present, not null, not a blank string. Optionally pinned to one node kind.
    RequiredScalar { expect: Option<NodeKind> },
    /// Present, an array, with at least `min_items` entries.
    NonEmptySequence { min_items: usize },
}

impl RuleKind {
    fn target(&self) -> RuleTarget {
        match self {
            RuleKind::RequiredScalar { .. } => RuleTarget::Field,
            RuleKind::NonEmptySequence { .. } => RuleTarget::Array,
        }
    }
}

/// One declarative check. `candidates` holds the path followed by any
/// legacy alternatives, in priority order; it is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    candidates: Vec<FieldPath>,
    pub description: String,
    pub kind: RuleKind,
}

impl ValidationRule {
    pub fn scalar(path: &str, description: &str) -> Result<Self, PathError> {
        Self::scalar_any_of(&[path], description)
    }

    /// A scalar rule satisfied by the first of several keys.
    pub fn scalar_any_of(paths: &[&str], description: &str) -> Result<Self, PathError> {
        Self::new(paths, description, RuleKind::RequiredScalar { expect: None })
    }

    pub fn sequence(path: &str, description: &str) -> Result<Self, PathError> {
        Self::new(
            &[path],
            description,
            RuleKind::NonEmptySequence {
                min_items: DEFAULT_MIN_ITEMS,
            },
        )
    }

    fn new(paths: &[&str], description: &str, kind: RuleKind) -> Result<Self, PathError> {
        let candidates = paths
            .iter()
            .map(|p| FieldPath::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        if candidates.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self {
            candidates,
            description: description.to_string(),
            kind,
        })
    }

    /// Requires the resolved scalar to be of `kind`.
    pub fn expecting(mut self, kind: NodeKind) -> Self {
        if let RuleKind::RequiredScalar { expect } = &mut self.kind {
            *expect = Some(kind);
        }
        self
    }

    #[cfg(test)]
    pub fn with_min_items(mut self, min: usize) -> Self {
        if let RuleKind::NonEmptySequence { min_items } = &mut self.kind {
            *min_items = min;
        }
        self
    }

    /// The same rule with every candidate path prefixed by `base`.
    pub fn rebased(&self, base: &FieldPath) -> Self {
        Self {
            candidates: self.candidates.iter().map(|c| base.concat(c)).collect(),
            description: self.description.clone(),
            kind: self.kind.clone(),
        }
    }

    fn path_label(&self) -> String {
        self.candidates
            .iter()
            .map(FieldPath::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn fail(&self, path: String, kind: FailureKind) -> ValidationError {
        ValidationError {
            path,
            description: self.description.clone(),
            target: self.kind.target(),
            kind,
        }
    }

    fn unresolved(&self, error: ResolutionError) -> ValidationError {
        let kind = match error {
            ResolutionError::MissingParent { parent } => FailureKind::MissingParent { parent },
            ResolutionError::MissingField => FailureKind::MissingField,
        };
        self.fail(self.path_label(), kind)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Checks
// ────────────────────────────────────────────────────────────────────────────

/// Applies one rule to `root`, returning the resolved value on success.
pub fn check<'a>(root: &'a Value, rule: &ValidationRule) -> Result<&'a Value, ValidationError> {
    check_located(root, rule).map(|(_, value)| value)
}

/// Like [`check`], also returning which candidate path satisfied the rule.
pub fn check_located<'a, 'r>(
    root: &'a Value,
    rule: &'r ValidationRule,
) -> Result<(&'r FieldPath, &'a Value), ValidationError> {
    match &rule.kind {
        RuleKind::RequiredScalar { expect } => check_scalar(root, rule, *expect),
        RuleKind::NonEmptySequence { min_items } => check_sequence(root, rule, *min_items),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_scalar<'a, 'r>(
    root: &'a Value,
    rule: &'r ValidationRule,
    expect: Option<NodeKind>,
) -> Result<(&'r FieldPath, &'a Value), ValidationError> {
    let mut first_blank: Option<&FieldPath> = None;
    let mut first_error: Option<ResolutionError> = None;

    for candidate in &rule.candidates {
        match resolve(root, candidate) {
            Ok(value) if !is_blank(value) => {
                if let Some(expected) = expect {
                    let found = NodeKind::of(value);
                    if found != expected {
                        return Err(rule.fail(
                            candidate.to_string(),
                            FailureKind::WrongType { expected, found },
                        ));
                    }
                }
                return Ok((candidate, value));
            }
            Ok(_) => {
                first_blank.get_or_insert(candidate);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match (first_blank, first_error) {
        (Some(path), _) => Err(rule.fail(path.to_string(), FailureKind::EmptyValue)),
        (None, Some(error)) => Err(rule.unresolved(error)),
        (None, None) => Err(rule.unresolved(ResolutionError::MissingField)),
    }
}

fn check_sequence<'a, 'r>(
    root: &'a Value,
    rule: &'r ValidationRule,
    min_items: usize,
) -> Result<(&'r FieldPath, &'a Value), ValidationError> {
    let (path, value) =
        resolve_first(root, &rule.candidates).map_err(|e| rule.unresolved(e))?;

    let Value::Array(items) = value else {
        return Err(rule.fail(
            path.to_string(),
            FailureKind::WrongType {
                expected: NodeKind::Array,
                found: NodeKind::of(value),
            },
        ));
    };

    if items.len() < min_items {
        return Err(rule.fail(
            path.to_string(),
            FailureKind::TooFewItems {
                required: min_items,
                found: items.len(),
            },
        ));
    }

    Ok((path, value))
}
