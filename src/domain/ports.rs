use crate::core::serialize::OutputMode;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 檔案存取介面，轉換流程本身不直接碰檔案系統
pub trait DocumentStore: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    /// Absolute form of `path`, used in provenance headers.
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Settings for one `json5schema` run.
pub trait ConvertConfig: Send + Sync {
    fn input(&self) -> &Path;
    fn output(&self) -> Option<&Path>;
    fn merge_path(&self) -> Option<&Path>;
    fn schema_url(&self) -> &str;
    fn output_mode(&self) -> OutputMode;
}

/// HTML → paginated PDF. Each call is independent of every other call.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str, output: &Path) -> Result<()>;
}
