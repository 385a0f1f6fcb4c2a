//! Built-in rule sets, one per supported version of the résumé data format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::NodeKind;
use crate::validation::engine::{RuleSet, Section};
use crate::validation::path::PathError;
use crate::validation::rules::ValidationRule;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Identity plus non-empty experience, education and skills.
    #[default]
    Standard,
    /// Adds summary, phone, location, durations and a numeric graduation year.
    Strict,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Strict => "strict",
        }
    }

    pub fn rule_set(&self) -> Result<RuleSet, PathError> {
        let strict = *self == Profile::Strict;

        let mut personal = Section::new("Validating personal information", "Personal information")
            .field(ValidationRule::scalar("name", "Full Name")?)
            .field(ValidationRule::scalar("email", "Email Address")?);
        if strict {
            personal = personal
                .field(ValidationRule::scalar_any_of(
                    &["professional_summary", "summary"],
                    "Professional Summary",
                )?)
                .field(ValidationRule::scalar("contact.phone", "Phone Number")?)
                .field(ValidationRule::scalar("contact.location", "Location")?);
        }

        let mut experience_rules = vec![
            ValidationRule::scalar("company", "Experience Company")?,
            ValidationRule::scalar_any_of(&["role", "jobTitle"], "Experience Role")?,
        ];
        if strict {
            experience_rules.push(ValidationRule::scalar_any_of(
                &["duration", "startDate"],
                "Experience Duration",
            )?);
        }

        let mut graduation =
            ValidationRule::scalar_any_of(&["graduation_year", "graduationYear"], "Graduation Year")?;
        if strict {
            graduation = graduation.expecting(NodeKind::Number);
        }
        let education_rules = vec![
            ValidationRule::scalar_any_of(&["school", "institution"], "Education School")?,
            ValidationRule::scalar("degree", "Education Degree")?,
            graduation,
        ];

        let skill_rules = vec![
            ValidationRule::scalar("category", "Skill Category")?,
            ValidationRule::sequence("items", "Skill Items")?,
        ];

        Ok(RuleSet {
            name: self.as_str().to_string(),
            sections: vec![
                personal,
                Section::new("Validating professional experience", "Professional experience")
                    .counting("entries")
                    .entries(
                        ValidationRule::sequence("experience", "Experience Array")?,
                        experience_rules,
                    ),
                Section::new("Validating education", "Education")
                    .counting("entries")
                    .entries(
                        ValidationRule::sequence("education", "Education Array")?,
                        education_rules,
                    ),
                Section::new("Validating skills", "Skills")
                    .counting("skill categories")
                    .entries(ValidationRule::sequence("skills", "Skills Array")?, skill_rules),
            ],
        })
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Profile::Standard),
            "strict" => Ok(Profile::Strict),
            other => Err(format!("unknown validation profile '{other}' (expected standard or strict)")),
        }
    }
}
