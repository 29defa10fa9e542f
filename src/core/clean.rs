use serde_json::Value;
use url::Url;

/// 清理純量值：字串去除前後空白，空字串與 null 視為不存在
pub fn clean(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => clean_str(s).map(|s| Value::String(s.to_string())),
        other => Some(other.clone()),
    }
}

pub fn clean_str(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Cleans `value` and keeps it only when it is a non-empty string.
pub fn clean_string(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).and_then(clean_str)
}

/// Falsy values are null, false, zero, and empty strings, arrays or objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

/// Returns the sequence when it exists and has at least one element.
pub fn non_empty_sequence(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array).filter(|items| !items.is_empty())
}

/// 有 scheme 也有 host 才算合法 URI
pub fn is_valid_uri(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}
