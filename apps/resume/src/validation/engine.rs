//! Ordered, fail-fast validation pass over a whole document.
//!
//! Sections run in declaration order and checks inside a section run in
//! order; entry rules are applied to every element of a sequence, in array
//! order, before the next check starts. The first violation ends the pass.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::output::OutputSink;
use crate::validation::path::FieldPath;
use crate::validation::report::ValidationError;
use crate::validation::rules::{check, check_located, ValidationRule};

#[derive(Debug, Clone)]
pub enum Check {
    Field(ValidationRule),
    /// A sequence rule plus rules applied to each of its entries. Entry
    /// rule paths are relative to the entry.
    Entries {
        sequence: ValidationRule,
        entry_rules: Vec<ValidationRule>,
    },
}

#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub label: String,
    /// Noun used when reporting the entry count, e.g. "entries".
    pub unit: Option<String>,
    pub checks: Vec<Check>,
}

impl Section {
    pub fn new(heading: &str, label: &str) -> Self {
        Self {
            heading: heading.to_string(),
            label: label.to_string(),
            unit: None,
            checks: Vec::new(),
        }
    }

    pub fn counting(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn field(mut self, rule: ValidationRule) -> Self {
        self.checks.push(Check::Field(rule));
        self
    }

    pub fn entries(mut self, sequence: ValidationRule, entry_rules: Vec<ValidationRule>) -> Self {
        self.checks.push(Check::Entries {
            sequence,
            entry_rules,
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub label: String,
    pub entries: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub profile: String,
    pub sections: Vec<SectionSummary>,
}

/// Runs every rule in `rules` against `document`, stopping at the first failure.
pub fn validate(
    document: &Value,
    rules: &RuleSet,
    sink: &dyn OutputSink,
) -> Result<ValidationSummary, ValidationError> {
    let mut summaries = Vec::with_capacity(rules.sections.len());

    for section in &rules.sections {
        sink.info(&format!("{}...", section.heading));
        let mut last_count = None;

        for item in &section.checks {
            match item {
                Check::Field(rule) => {
                    check(document, rule)?;
                }
                Check::Entries {
                    sequence,
                    entry_rules,
                } => {
                    last_count = Some(check_entries(document, sequence, entry_rules)?);
                }
            }
        }

        let message = match (&section.unit, last_count) {
            (Some(unit), Some(n)) => format!("{} validated ({n} {unit})", section.label),
            _ => format!("{} validated", section.label),
        };
        sink.success(&message);

        summaries.push(SectionSummary {
            label: section.label.clone(),
            entries: last_count,
        });
    }

    sink.success("All validation checks passed for PDF generation!");
    Ok(ValidationSummary {
        profile: rules.name.clone(),
        sections: summaries,
    })
}

fn check_entries(
    document: &Value,
    sequence: &ValidationRule,
    entry_rules: &[ValidationRule],
) -> Result<usize, ValidationError> {
    let (base, value) = check_located(document, sequence)?;
    let count = value.as_array().map(Vec::len).unwrap_or(0);

    for index in 0..count {
        let entry_base: FieldPath = base.index(index);
        for rule in entry_rules {
            let absolute = rule.rebased(&entry_base);
            check(document, &absolute)?;
        }
        debug!(path = %entry_base, rules = entry_rules.len(), "Entry validated");
    }

    Ok(count)
}
