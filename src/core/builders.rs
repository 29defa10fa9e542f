//! One builder per JSON Resume section. Every builder reads only the merged
//! source document, never the output of another builder, and never fails:
//! missing or mistyped fields are defaulted or left out.

use crate::core::clean::{clean_string, non_empty_sequence, truthy};
use crate::core::profiles::{clean_profile, github_profile, push_unique};
use crate::domain::model::{
    Basics, EducationEntry, KeywordGroup, Meta, Profile, Project, WorkEntry,
};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const UNKNOWN_NAME: &str = "Unknown";

static FOUR_DIGIT_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

/// Mapping items of a sequence field; everything else is skipped.
fn mappings<'a>(value: Option<&'a Value>) -> impl Iterator<Item = &'a Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn field(source: &Map<String, Value>, key: &str) -> Value {
    source.get(key).cloned().unwrap_or(Value::Null)
}

pub fn build_basics(source: &Map<String, Value>) -> Basics {
    let name = source
        .get("name")
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::from(UNKNOWN_NAME));

    let mut profiles: Vec<Profile> = mappings(source.get("profiles"))
        .filter_map(clean_profile)
        .collect();

    if let Some(github) = clean_string(source.get("github")).and_then(github_profile) {
        push_unique(&mut profiles, github);
    }

    Basics {
        name,
        label: truthy(source.get("title")).cloned(),
        email: truthy(source.get("email")).cloned(),
        url: clean_string(source.get("portfolio")).map(Value::from),
        profiles,
    }
}

pub fn build_work(source: &Map<String, Value>, today: NaiveDate) -> Vec<WorkEntry> {
    mappings(source.get("experience"))
        .map(|job| {
            let end_date = job
                .get("end")
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::from(today.format("%Y-%m-%d").to_string()));

            WorkEntry {
                name: field(job, "company"),
                position: field(job, "title"),
                start_date: field(job, "start"),
                end_date,
                highlights: job
                    .get("achievements")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                keywords: non_empty_sequence(job.get("skills")).cloned(),
            }
        })
        .collect()
}

pub fn build_skills(source: &Map<String, Value>) -> Vec<KeywordGroup> {
    [("Core", "skills"), ("Secondary", "secondarySkills")]
        .into_iter()
        .filter_map(|(name, key)| {
            non_empty_sequence(source.get(key)).map(|keywords| KeywordGroup {
                name: name.to_string(),
                keywords: keywords.clone(),
            })
        })
        .collect()
}

pub fn build_projects(source: &Map<String, Value>) -> Vec<Project> {
    let Some(items) = source.get("projects").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(Project {
                name: Some(Value::from(name.as_str())),
                ..Default::default()
            }),
            Value::Object(project) => Some(Project {
                name: truthy(project.get("name")).cloned(),
                description: truthy(project.get("description")).cloned(),
                url: truthy(project.get("url")).cloned(),
                keywords: non_empty_sequence(project.get("skills")).cloned(),
            }),
            _ => None,
        })
        .collect()
}

pub fn build_education(source: &Map<String, Value>) -> Vec<EducationEntry> {
    mappings(source.get("education"))
        .map(|item| EducationEntry {
            institution: field(item, "provider"),
            study_type: field(item, "degree"),
            area: field(item, "summary"),
            end_date: truthy(item.get("year"))
                .and_then(normalize_year)
                .map(Value::from),
        })
        .collect()
}

/// `2020` → `2020-01-01`; other non-blank values pass through trimmed.
pub fn normalize_year(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else if FOUR_DIGIT_YEAR.is_match(&text) {
        Some(format!("{text}-01-01"))
    } else {
        Some(text)
    }
}

pub fn build_interests(source: &Map<String, Value>) -> Vec<KeywordGroup> {
    non_empty_sequence(source.get("keywords"))
        .map(|keywords| {
            vec![KeywordGroup {
                name: "Keywords".to_string(),
                keywords: keywords.clone(),
            }]
        })
        .unwrap_or_default()
}

pub fn build_meta(source: &Map<String, Value>) -> Meta {
    Meta {
        match_score: source.get("matchScore").cloned(),
        match_factors: source.get("matchFactors").cloned(),
    }
}
