//! HTML rendering for the PDF path. A résumé document is flattened into a
//! [`TemplateData`] bag (with render defaults filled in) and then rendered
//! into a single self-contained HTML page through the `cv` handlebars
//! template.

use crate::core::clean::is_truthy;
use crate::core::document::parse_document;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{CvError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Fallback values for the header and the optional sections.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDefaults {
    pub name: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub education: Vec<Value>,
    pub projects: Vec<Value>,
    pub lang: String,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            email: "email@example.com".to_string(),
            github: "https://github.com".to_string(),
            linkedin: "https://linkedin.com".to_string(),
            education: Vec::new(),
            projects: Vec::new(),
            lang: "en".to_string(),
        }
    }
}

impl RenderDefaults {
    /// 檔案中缺少的欄位沿用內建預設值
    pub fn from_document(doc: &Map<String, Value>) -> Self {
        let builtin = Self::default();
        let text = |key: &str, fallback: String| {
            doc.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(fallback)
        };
        let list = |key: &str, fallback: Vec<Value>| {
            doc.get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or(fallback)
        };

        Self {
            name: text("name", builtin.name),
            email: text("email", builtin.email),
            github: text("github", builtin.github),
            linkedin: text("linkedin", builtin.linkedin),
            education: list("education", builtin.education),
            projects: list("projects", builtin.projects),
            lang: text("lang", builtin.lang),
        }
    }

    /// Missing file → built-in defaults. Unparsable file → warning and
    /// built-in defaults.
    pub fn load<S: DocumentStore + ?Sized>(store: &S, path: &Path) -> Self {
        if !store.exists(path) {
            tracing::debug!("No defaults file at {}, using built-in defaults", path.display());
            return Self::default();
        }

        let parsed = store
            .read_to_string(path)
            .and_then(|text| parse_document(path, &text));

        match parsed {
            Ok(doc) => Self::from_document(&doc),
            Err(e) => {
                tracing::warn!("⚠️ Failed to parse defaults: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub skills: &'static str,
    pub experience: &'static str,
    pub projects: &'static str,
    pub education: &'static str,
    pub present: &'static str,
}

impl Labels {
    pub fn for_lang(lang: &str) -> Self {
        match lang {
            "es" => Self {
                skills: "Habilidades",
                experience: "Experiencia",
                projects: "Proyectos",
                education: "Educación",
                present: "Presente",
            },
            _ => Self {
                skills: "Skills",
                experience: "Experience",
                projects: "Projects",
                education: "Education",
                present: "Present",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceItem {
    pub title: String,
    pub company: String,
    pub dates: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectItem {
    pub name: String,
    pub url: Option<String>,
    pub display_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationItem {
    pub degree: String,
    pub school: String,
    pub year: String,
}

/// The data bag handed to [`CvTemplate::render`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateData {
    pub name: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceItem>,
    pub projects: Vec<ProjectItem>,
    pub education: Vec<EducationItem>,
    pub lang: String,
    pub labels: Labels,
}

/// Scalars as display text; arrays, objects and null have none.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or(map: &Map<String, Value>, key: &str, fallback: &str) -> String {
    map.get(key)
        .and_then(display_text)
        .unwrap_or_else(|| fallback.to_string())
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(display_text).collect())
        .unwrap_or_default()
}

impl TemplateData {
    /// Shallow merge of the résumé over `defaults`, then flattening into
    /// display strings.
    pub fn from_resume(resume: &Map<String, Value>, defaults: &RenderDefaults) -> Self {
        let lang = text_or(resume, "lang", "en");
        let labels = Labels::for_lang(&lang);

        // education / projects：鍵存在就用輸入的值，即使是空陣列
        let projects = match resume.get("projects") {
            Some(value) => value.as_array().cloned().unwrap_or_default(),
            None => defaults.projects.clone(),
        };
        let education = match resume.get("education") {
            Some(value) => value.as_array().cloned().unwrap_or_default(),
            None => defaults.education.clone(),
        };

        let experience = resume
            .get("experience")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .map(|job| experience_item(job, &labels))
            .collect();

        Self {
            name: text_or(resume, "name", &defaults.name),
            email: text_or(resume, "email", &defaults.email),
            github: text_or(resume, "github", &defaults.github),
            linkedin: text_or(resume, "linkedin", &defaults.linkedin),
            summary: text_or(resume, "summary", ""),
            skills: text_list(resume.get("skills")),
            experience,
            projects: projects.iter().filter_map(project_item).collect(),
            education: education
                .iter()
                .filter_map(Value::as_object)
                .map(education_item)
                .collect(),
            lang,
            labels,
        }
    }
}

fn experience_item(job: &Map<String, Value>, labels: &Labels) -> ExperienceItem {
    let start = job.get("start").and_then(Value::as_str).unwrap_or_default();
    let end = job.get("end").and_then(Value::as_str).unwrap_or_default();

    let dates = if !start.is_empty() {
        let end_text = if end.is_empty() {
            labels.present.to_string()
        } else {
            format_date(end)
        };
        format!("{} - {}", format_date(start), end_text)
    } else {
        text_or(job, "timeframe", "")
    };

    ExperienceItem {
        title: text_or(job, "title", ""),
        company: text_or(job, "company", ""),
        dates,
        achievements: text_list(job.get("achievements")),
    }
}

/// Plain strings and entries without name, url and description are skipped.
fn project_item(value: &Value) -> Option<ProjectItem> {
    let project = value.as_object()?;
    let has_content = ["name", "url", "description"]
        .iter()
        .any(|key| project.get(*key).is_some_and(is_truthy));
    if !has_content {
        return None;
    }

    let url = project
        .get("url")
        .and_then(display_text)
        .filter(|url| url != "#");

    Some(ProjectItem {
        name: text_or(project, "name", "Untitled"),
        display_url: url.as_deref().map(format_url),
        url,
        description: project
            .get("description")
            .and_then(display_text)
            .filter(|d| !d.is_empty()),
    })
}

fn education_item(edu: &Map<String, Value>) -> EducationItem {
    let school = edu
        .get("school")
        .or_else(|| edu.get("provider"))
        .and_then(display_text)
        .unwrap_or_else(|| "School".to_string());

    EducationItem {
        degree: text_or(edu, "degree", "Degree"),
        school,
        year: text_or(edu, "year", ""),
    }
}

/// ISO 日期或日期時間 → `Jan 2020`，無法解析時回傳空字串
pub fn format_date(date_str: &str) -> String {
    let raw = date_str.trim();
    if raw.is_empty() {
        return String::new();
    }

    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    let date = DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            [
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M:%S",
            ]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{normalized}-01"), "%Y-%m-%d").ok());

    date.map(|d| d.format("%b %Y").to_string()).unwrap_or_default()
}

pub fn format_url(url: &str) -> String {
    url.replace("https://", "")
        .replace("http://", "")
        .replace("www.", "")
}

const CV_TEMPLATE_NAME: &str = "cv";

const CV_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{name}} - CV</title>
  <style>
{{{page_css}}}
{{{css}}}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>{{name}}</h1>
      <div class="contact-info">
        {{#each contact}}{{#unless @first}}
        <span>|</span>
        {{/unless}}<a href="{{href}}">{{text}}</a>{{/each}}
      </div>
    </header>
{{#if summary}}
    <section class="summary-section">
      <p>{{summary}}</p>
    </section>
{{/if}}
{{#if primary_skills}}
    <section class="skills-section">
      <h2 class="section-header">{{labels.skills}}</h2>
      <div class="skills-list">
        <div class="skills-primary">{{primary_skills}}</div>
        {{#if secondary_skills}}<div class="skills-secondary">{{secondary_skills}}</div>{{/if}}
      </div>
    </section>
{{/if}}
{{#if experience}}
    <section class="experience-section">
      <h2 class="section-header">{{labels.experience}}</h2>
{{#each experience}}
      <div class="job-item">
        <div class="job-header">
          <div>
            <span class="job-title">{{title}}</span>
            <span>at {{company}}</span>
          </div>
          <span class="job-dates">{{dates}}</span>
        </div>
        <ul class="achievements-list">
{{#each achievements}}
            <li>{{this}}</li>
{{/each}}
        </ul>
      </div>
{{/each}}
    </section>
{{/if}}
{{#if projects}}
    <section class="projects-section">
      <h2 class="section-header">{{labels.projects}}</h2>
{{#each projects}}
      <div class="project-item">
        <div class="project-header">
          <a href="{{#if url}}{{url}}{{else}}#{{/if}}" target="_blank" rel="noopener noreferrer" class="project-name">{{name}}</a>
          {{#if url}}<a href="{{url}}" target="_blank" rel="noopener noreferrer" class="project-url">{{display_url}}</a>{{/if}}
        </div>
        {{#if description}}<p class="project-description">{{description}}</p>{{/if}}
      </div>
{{/each}}
    </section>
{{/if}}
{{#if education}}
    <section class="education-section">
      <h2 class="section-header">{{labels.education}}</h2>
{{#each education}}
      <div class="education-item">
        <div>
          <span class="degree">{{degree}}</span>
          <span>from {{school}}</span>
        </div>
        <span class="year">{{year}}</span>
      </div>
{{/each}}
    </section>
{{/if}}
  </div>
</body>
</html>
"#;

#[derive(Debug, Clone, Serialize)]
struct ContactLink {
    href: String,
    text: String,
}

/// What the `cv` template sees: the data bag plus the stylesheet and the
/// values that need splitting or joining first.
#[derive(Serialize)]
struct PageView<'a> {
    #[serde(flatten)]
    data: &'a TemplateData,
    css: &'a str,
    page_css: &'a str,
    contact: Vec<ContactLink>,
    primary_skills: String,
    secondary_skills: String,
}

impl<'a> PageView<'a> {
    fn new(data: &'a TemplateData, css: &'a str, page_css: &'a str) -> Self {
        let mut contact = Vec::new();
        if !data.email.is_empty() {
            contact.push(ContactLink {
                href: format!("mailto:{}", data.email),
                text: data.email.clone(),
            });
        }
        for url in [&data.github, &data.linkedin] {
            if !url.is_empty() {
                contact.push(ContactLink {
                    href: url.clone(),
                    text: format_url(url),
                });
            }
        }

        // 前兩項為主要技能，其餘為次要
        let (primary, secondary) = data.skills.split_at(data.skills.len().min(2));

        Self {
            data,
            css,
            page_css,
            contact,
            primary_skills: primary.join(", "),
            secondary_skills: secondary.join(", "),
        }
    }
}

/// The compiled HTML template. Interpolated text is HTML-escaped; the
/// stylesheet and the `@page` rule are inserted verbatim.
pub struct CvTemplate {
    registry: Handlebars<'static>,
}

impl CvTemplate {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(CV_TEMPLATE_NAME, CV_TEMPLATE)
            .map_err(|e| CvError::TemplateError {
                message: e.to_string(),
            })?;
        Ok(Self { registry })
    }

    pub fn render(&self, data: &TemplateData, css: &str, page_css: &str) -> Result<String> {
        self.registry
            .render(CV_TEMPLATE_NAME, &PageView::new(data, css, page_css))
            .map_err(|e| CvError::TemplateError {
                message: e.to_string(),
            })
    }
}
