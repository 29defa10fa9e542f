use crate::config::toml_config::BrowserConfig;
use crate::domain::ports::PdfRenderer;
use crate::utils::error::{CvError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

/// Prints HTML to PDF with a headless Chromium-based browser. Page size and
/// margins come from the `@page` rule embedded in the HTML.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    executable: String,
    extra_args: Vec<String>,
    timeout: Duration,
}

impl ChromeRenderer {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            extra_args: config.extra_args.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// 額外參數放在最前面，方便用 wrapper script 當作 executable
    pub fn command_args(&self, html_path: &Path, output: &Path) -> Vec<String> {
        let page_url = Url::from_file_path(html_path)
            .map(String::from)
            .unwrap_or_else(|_| format!("file://{}", html_path.display()));

        let mut args = self.extra_args.clone();
        args.extend([
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-pdf-header-footer".to_string(),
            format!("--print-to-pdf={}", output.display()),
            page_url,
        ]);
        args
    }

    fn render_error(output: &Path, message: impl Into<String>) -> CvError {
        CvError::RenderError {
            file: output.to_path_buf(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for ChromeRenderer {
    async fn render(&self, html: &str, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 暫存的 HTML 在 staging drop 時刪除
        let staging = tempfile::Builder::new()
            .prefix("cvforge-")
            .suffix(".html")
            .tempfile()?;
        tokio::fs::write(staging.path(), html).await?;

        let args = self.command_args(staging.path(), output);
        tracing::debug!("Running {} {:?}", self.executable, args);

        let run = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                Self::render_error(output, format!("browser timed out after {:?}", self.timeout))
            })?
            .map_err(|e| {
                Self::render_error(output, format!("failed to start '{}': {}", self.executable, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let last_line = stderr.lines().last().unwrap_or_default().trim().to_string();
            return Err(Self::render_error(
                output,
                format!("browser exited with {}: {}", result.status, last_line),
            ));
        }

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(Self::render_error(output, "browser did not produce a PDF"));
        }

        Ok(())
    }
}
