//! Line-oriented field parser for extracted resume text.
//!
//! Each line is tested against `FIELD_RULES` in order and the first rule whose
//! label occurs anywhere in the line claims it; later rules are not consulted.
//! A line such as `Name: Phone: 123` is therefore a Name line with value
//! `Phone: 123`. The value stops at a second occurrence of the same label. A
//! later line for the same field overwrites the earlier value.

use crate::models::resume::ResumeFields;

type Apply = fn(&mut ResumeFields, &str);

/// One labeled field: the literal label to look for and how to store the
/// trimmed text that follows it.
pub struct FieldRule {
    pub label: &'static str,
    apply: Apply,
}

/// Priority order matters: Name, Email, Phone, Skills.
pub static FIELD_RULES: [FieldRule; 4] = [
    FieldRule {
        label: "Name:",
        apply: |fields, value| fields.name = Some(value.to_string()),
    },
    FieldRule {
        label: "Email:",
        apply: |fields, value| fields.email = Some(value.to_string()),
    },
    FieldRule {
        label: "Phone:",
        apply: |fields, value| fields.phone = Some(value.to_string()),
    },
    FieldRule {
        label: "Skills:",
        apply: |fields, value| fields.skills = split_skills(value),
    },
];

const SKILL_SEPARATOR: &str = ", ";

fn split_skills(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(SKILL_SEPARATOR).map(String::from).collect()
}

/// Extracts the labeled fields from raw text. Fields whose label never appears
/// stay unset.
pub fn parse_resume_text(text: &str) -> ResumeFields {
    let mut fields = ResumeFields::default();
    for line in text.lines() {
        if let Some((rule, rest)) = FIELD_RULES
            .iter()
            .find_map(|rule| line.split_once(rule.label).map(|(_, rest)| (rule, rest)))
        {
            let value = rest.split_once(rule.label).map_or(rest, |(head, _)| head);
            (rule.apply)(&mut fields, value.trim());
        }
    }
    fields
}
