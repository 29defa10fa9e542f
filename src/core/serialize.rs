use crate::domain::model::Resume;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::LazyLock;

pub const DEFAULT_SCHEMA_URL: &str = "https://jsonresume.org/schema";

const INDENT: &str = "  ";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "Infinity", "NaN",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Json,
    Json5,
}

/// JSON5 輸出開頭的來源註解
#[derive(Debug, Clone)]
pub struct Provenance {
    pub schema_url: String,
    pub source: PathBuf,
    pub generated_at: DateTime<Utc>,
}

impl Provenance {
    pub fn now(schema_url: impl Into<String>, source: PathBuf) -> Self {
        Self {
            schema_url: schema_url.into(),
            source,
            generated_at: Utc::now(),
        }
    }

    pub fn header_comment(&self) -> String {
        [
            format!("// JSON Resume schema: {}", self.schema_url),
            format!("// Source: {}", self.source.display()),
            format!("// Generated: {}", self.generated_at.to_rfc3339()),
        ]
        .join("\n")
    }
}

/// Pretty strict JSON, no comments, trailing newline.
pub fn to_json_string(resume: &Resume) -> Result<String> {
    let payload = serde_json::to_string_pretty(resume)?;
    Ok(format!("{payload}\n"))
}

pub fn to_json5_string(resume: &Resume, provenance: &Provenance) -> Result<String> {
    let value = serde_json::to_value(resume)?;
    let payload = json5_pretty(&value);
    Ok(format!("{}\n{payload}\n", provenance.header_comment()))
}

pub fn serialize(resume: &Resume, mode: OutputMode, provenance: &Provenance) -> Result<String> {
    match mode {
        OutputMode::Json => to_json_string(resume),
        OutputMode::Json5 => to_json5_string(resume, provenance),
    }
}

/// JSON5 with two-space indentation, identifier keys unquoted and no
/// trailing commas.
pub fn json5_pretty(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_key(out, key);
                out.push_str(": ");
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push('}');
        }
        Value::String(text) => write_string(out, text),
        // 數字、布林與 null 沿用 serde_json 的寫法
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

fn write_key(out: &mut String, key: &str) {
    if IDENTIFIER.is_match(key) && !RESERVED_WORDS.contains(&key) {
        out.push_str(key);
    } else {
        write_string(out, key);
    }
}

/// JSON string escaping plus `\u2028` and `\u2029`, which JSON5 parsers
/// reject inside string literals.
fn write_string(out: &mut String, text: &str) {
    let quoted = Value::from(text).to_string();
    if quoted.contains(['\u{2028}', '\u{2029}']) {
        out.push_str(&quoted.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029"));
    } else {
        out.push_str(&quoted);
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
