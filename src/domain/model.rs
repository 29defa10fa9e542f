use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Canonical JSON Resume document. Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resume {
    pub basics: Basics,
    pub work: Vec<WorkEntry>,
    pub skills: Vec<KeywordGroup>,
    pub projects: Vec<Project>,
    pub education: Vec<EducationEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<KeywordGroup>,
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Basics {
    pub name: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

/// 個人檔案項目：`network`、`username`、`url` 以及輸入中其他清理過的欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Profile(pub Map<String, Value>);

impl Profile {
    pub fn network(&self) -> Option<&str> {
        self.0.get("network").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    pub name: Value,
    pub position: Value,
    pub start_date: Value,
    pub end_date: Value,
    pub highlights: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Value>>,
}

/// `skills` 與 `interests` 共用的分組格式
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: Value,
    pub study_type: Value,
    pub area: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Value>,
}

/// `Some(Value::Null)` means the key was present with a null value; it is
/// still copied through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_factors: Option<Value>,
}

impl Meta {
    pub fn is_empty(&self) -> bool {
        self.match_score.is_none() && self.match_factors.is_none()
    }
}

/// 單一 PDF 產生結果
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub file: PathBuf,
    pub output: PathBuf,
    pub error: Option<String>,
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub outcomes: Vec<RenderOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn message(&self) -> String {
        let mut message = format!("✅ Complete: {} succeeded", self.succeeded());
        if self.failed() > 0 {
            message.push_str(&format!(", {} failed", self.failed()));
        }
        message
    }
}
