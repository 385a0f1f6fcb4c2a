//! Layout mapping: projects the raw data document onto the fixed visual regions
//! of the résumé (header, summary, experience, skills, education, footer).
//!
//! The source tree is only read. Missing sections map to empty regions so an
//! incomplete document still renders; only a non-object root is rejected.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::document::NodeKind;
use crate::render::RenderError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl PersonalInfo {
    /// Contact details in display order, skipping the absent ones.
    pub fn contact_line(&self) -> Vec<&str> {
        [
            &self.email,
            &self.phone,
            &self.location,
            &self.github,
            &self.linkedin,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperienceBlock {
    pub role: String,
    pub company: String,
    pub duration: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EducationBlock {
    pub school: String,
    pub degree: String,
    pub graduation_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeLayout {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceBlock>,
    pub skills: Vec<SkillGroup>,
    pub education: Vec<EducationBlock>,
    pub generated_at: String,
}

impl ResumeLayout {
    pub fn from_document(document: &Value, generated_at: String) -> Result<Self, RenderError> {
        if !document.is_object() {
            return Err(RenderError::Layout(format!(
                "document root must be an object, found {}",
                NodeKind::of(document)
            )));
        }

        let contact = document.get("contact").unwrap_or(&Value::Null);
        let personal_info = PersonalInfo {
            name: text(document, &["name"]).unwrap_or_default(),
            email: text(document, &["email"]).or_else(|| text(contact, &["email"])),
            phone: text(contact, &["phone"]),
            location: text(contact, &["location"]),
            github: text(contact, &["github"]),
            linkedin: text(contact, &["linkedin"]),
        };

        let experience = entries(document, "experience")
            .iter()
            .map(|entry| ExperienceBlock {
                role: text(entry, &["role", "jobTitle"]).unwrap_or_default(),
                company: text(entry, &["company"]).unwrap_or_default(),
                duration: text(entry, &["duration", "startDate"]),
                achievements: strings(entry, "achievements"),
            })
            .collect();

        let education = entries(document, "education")
            .iter()
            .map(|entry| EducationBlock {
                school: text(entry, &["school", "institution"]).unwrap_or_default(),
                degree: text(entry, &["degree"]).unwrap_or_default(),
                graduation_year: text(entry, &["graduation_year", "graduationYear"]),
            })
            .collect();

        let skills = entries(document, "skills")
            .iter()
            .map(|entry| SkillGroup {
                category: text(entry, &["category"]).unwrap_or_default(),
                items: strings(entry, "items"),
            })
            .collect();

        Ok(Self {
            personal_info,
            summary: text(document, &["professional_summary", "summary"]),
            experience,
            skills,
            education,
            generated_at,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.experience.is_empty() && self.education.is_empty() && self.skills.is_empty()
    }
}

/// Footer timestamp, e.g. "March 4, 2026, 09:15".
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%B %-d, %Y, %H:%M").to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// First of `keys` holding a non-blank scalar, as display text.
fn text(node: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| node.get(*key).and_then(scalar_text))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral floats print as whole numbers ("2020.0" -> "2020").
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// The array under `key`, or an empty slice when it is absent or not an array.
fn entries<'a>(node: &'a Value, key: &str) -> &'a [Value] {
    match node.get(key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            warn!(
                section = key,
                found = %NodeKind::of(other),
                "Section is not an array; rendering it as empty"
            );
            &[]
        }
    }
}

fn strings(node: &Value, key: &str) -> Vec<String> {
    entries(node, key).iter().filter_map(scalar_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn layout(doc: Value) -> ResumeLayout {
        ResumeLayout::from_document(&doc, "now".to_string()).unwrap()
    }

    #[test]
    fn test_maps_personal_info_from_contact() {
        let l = layout(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "contact": {"phone": "123", "location": "London", "github": "github.com/ada"}
        }));
        assert_eq!(l.personal_info.name, "Ada Lovelace");
        assert_eq!(l.personal_info.phone.as_deref(), Some("123"));
        assert_eq!(
            l.personal_info.contact_line(),
            vec!["ada@example.com", "123", "London", "github.com/ada"]
        );
    }

    #[test]
    fn test_source_document_is_not_mutated() {
        let doc = json!({"name": "A", "contact": {"phone": "1"}});
        let before = doc.clone();
        let _ = ResumeLayout::from_document(&doc, String::new()).unwrap();
        assert_eq!(doc, before);
        assert!(doc.get("personal_info").is_none());
    }

    #[test]
    fn test_legacy_keys_are_honoured() {
        let l = layout(json!({
            "name": "A",
            "summary": "Old-style summary",
            "experience": [{"company": "X", "jobTitle": "Dev", "startDate": "2019"}],
            "education": [{"institution": "MIT", "degree": "BSc", "graduationYear": 2020}]
        }));
        assert_eq!(l.summary.as_deref(), Some("Old-style summary"));
        assert_eq!(l.experience[0].role, "Dev");
        assert_eq!(l.experience[0].duration.as_deref(), Some("2019"));
        assert_eq!(l.education[0].school, "MIT");
        assert_eq!(l.education[0].graduation_year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_missing_sections_map_to_empty() {
        let l = layout(json!({"name": "Test", "experience": [], "education": [], "skills": []}));
        assert!(l.is_empty());
        assert!(l.summary.is_none());

        let bare = layout(json!({"name": "Test"}));
        assert!(bare.is_empty());
    }

    #[test]
    fn test_non_array_section_maps_to_empty() {
        let l = layout(json!({"name": "Test", "skills": "Rust, Go"}));
        assert!(l.skills.is_empty());
    }

    #[test]
    fn test_skill_items_keep_order_and_drop_blanks() {
        let l = layout(json!({"skills": [{"category": "Lang", "items": ["Rust", "", "Go", null]}]}));
        assert_eq!(l.skills[0].items, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_integral_float_year_prints_as_whole_number() {
        let l = layout(json!({
            "education": [
                {"school": "A", "degree": "D", "graduation_year": 2020.0},
                {"school": "B", "degree": "D", "graduation_year": 2020.5}
            ]
        }));
        assert_eq!(l.education[0].graduation_year.as_deref(), Some("2020"));
        assert_eq!(l.education[1].graduation_year.as_deref(), Some("2020.5"));
    }

    #[test]
    fn test_non_object_root_is_layout_error() {
        let err = ResumeLayout::from_document(&json!(["x"]), String::new()).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
    }

    #[test]
    fn test_timestamp_format() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 9, 15, 0).unwrap();
        assert_eq!(format_timestamp(at), "March 4, 2026, 09:15");
    }
}
