use crate::domain::ports::DocumentStore;
use crate::utils::error::{CvError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Parses JSON5 text and requires a mapping at the top level.
pub fn parse_document(path: &Path, text: &str) -> Result<Map<String, Value>> {
    let value: Value = json5::from_str(text).map_err(|e| CvError::DocumentParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CvError::NotAMappingError {
            path: path.to_path_buf(),
        }),
    }
}

/// 讀取並解析 JSON5 文件
pub fn load_document<S: DocumentStore + ?Sized>(
    store: &S,
    path: &Path,
) -> Result<Map<String, Value>> {
    tracing::debug!("Loading document {}", path.display());
    let text = store.read_to_string(path)?;
    parse_document(path, &text)
}
