//! Validation failure types and their human-readable rendering.
//!
//! Formatting is pure; printing and exit codes belong to the command layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::NodeKind;

/// Why a rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FailureKind {
    MissingParent { parent: String },
    MissingField,
    EmptyValue,
    WrongType { expected: NodeKind, found: NodeKind },
    TooFewItems { required: usize, found: usize },
}

impl FailureKind {
    /// Stable classification code.
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::MissingParent { .. } => "missing-parent",
            FailureKind::MissingField => "missing-field",
            FailureKind::EmptyValue => "empty-value",
            FailureKind::WrongType { .. } => "wrong-type",
            FailureKind::TooFewItems { .. } => "too-few-items",
        }
    }
}

/// What the failing rule was checking for; only affects wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    Field,
    Array,
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::Field => f.write_str("field"),
            RuleTarget::Array => f.write_str("array"),
        }
    }
}

/// The first violated rule of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Dotted path; alternatives are joined with ` | `.
    pub path: String,
    pub description: String,
    pub target: RuleTarget,
    pub kind: FailureKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (desc, path) = (&self.description, &self.path);
        match &self.kind {
            FailureKind::MissingParent { parent } => write!(
                f,
                "Missing required {}: {desc} (path: {path}; '{parent}' not found)",
                self.target
            ),
            FailureKind::MissingField => write!(
                f,
                "Missing required {}: {desc} (path: {path})",
                self.target
            ),
            FailureKind::EmptyValue => {
                write!(f, "Required field is empty: {desc} (path: {path})")
            }
            FailureKind::WrongType { expected, found } => {
                write!(f, "Expected {expected} but got {found}: {desc} (path: {path})")
            }
            FailureKind::TooFewItems { required, found } => write!(
                f,
                "Array must have at least {required} item(s): {desc} (path: {path}), found {found}"
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Machine-readable report (validate --json)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedFailure {
    pub path: String,
    pub description: String,
    pub message: String,
    #[serde(flatten)]
    pub kind: FailureKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub profile: String,
    pub error: Option<ReportedFailure>,
}

impl ValidationReport {
    pub fn passed(profile: &str) -> Self {
        Self {
            valid: true,
            profile: profile.to_string(),
            error: None,
        }
    }

    pub fn failed(profile: &str, error: &ValidationError) -> Self {
        Self {
            valid: false,
            profile: profile.to_string(),
            error: Some(ReportedFailure {
                path: error.path.clone(),
                description: error.description.clone(),
                message: error.to_string(),
                kind: error.kind.clone(),
            }),
        }
    }
}
