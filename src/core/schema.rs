use crate::core::builders::{
    build_basics, build_education, build_interests, build_meta, build_projects, build_skills,
    build_work,
};
use crate::core::merge::deep_merge;
use crate::domain::model::Resume;
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

/// Converts a merged source document into the canonical JSON Resume shape,
/// resolving open-ended jobs against today's local date.
pub fn to_json_resume(source: &Map<String, Value>) -> Resume {
    to_json_resume_on(source, Local::now().date_naive())
}

pub fn to_json_resume_on(source: &Map<String, Value>, today: NaiveDate) -> Resume {
    let resume = Resume {
        basics: build_basics(source),
        work: build_work(source, today),
        skills: build_skills(source),
        projects: build_projects(source),
        education: build_education(source),
        interests: build_interests(source),
        meta: build_meta(source),
    };

    tracing::debug!(
        "Assembled resume: {} jobs, {} skill groups, {} projects, {} education entries",
        resume.work.len(),
        resume.skills.len(),
        resume.projects.len(),
        resume.education.len()
    );

    resume
}

/// `defaults` 作為底層，`source` 的非 null 值優先
pub fn merge_and_convert(
    defaults: Option<&Map<String, Value>>,
    source: &Map<String, Value>,
) -> Resume {
    match defaults {
        Some(defaults) => to_json_resume(&deep_merge(defaults, source)),
        None => to_json_resume(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_fixed_key_order_and_optional_sections() {
        let resume = to_json_resume(&source(json!({"name": "Ada"})));
        let value = serde_json::to_value(&resume).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["basics", "work", "skills", "projects", "education"]);
    }

    #[test]
    fn test_optional_sections_appended_in_order() {
        let resume = to_json_resume(&source(json!({
            "keywords": ["rust"],
            "matchScore": 91,
            "name": "Ada"
        })));
        let value = serde_json::to_value(&resume).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["basics", "work", "skills", "projects", "education", "interests", "meta"]
        );
        assert_eq!(value["meta"], json!({"matchScore": 91}));
    }

    #[test]
    fn test_end_to_end_work_entry() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let resume = to_json_resume_on(
            &source(json!({
                "name": "Ada",
                "experience": [{"company": "Acme", "title": "Eng", "start": "2020-01-01"}]
            })),
            today,
        );

        assert_eq!(
            serde_json::to_value(&resume.work).unwrap(),
            json!([{
                "name": "Acme",
                "position": "Eng",
                "startDate": "2020-01-01",
                "endDate": "2026-10-17",
                "highlights": []
            }])
        );
    }

    #[test]
    fn test_defaults_fill_missing_fields_only() {
        let defaults = source(json!({"name": "Default", "email": "d@example.com"}));
        let input = source(json!({"name": "Ada", "email": null}));

        let resume = merge_and_convert(Some(&defaults), &input);

        assert_eq!(resume.basics.name, json!("Ada"));
        assert_eq!(resume.basics.email, Some(json!("d@example.com")));
    }
}
