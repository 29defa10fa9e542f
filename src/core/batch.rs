use crate::core::document::load_document;
use crate::core::template::{CvTemplate, RenderDefaults, TemplateData};
use crate::domain::model::{BatchSummary, RenderOutcome};
use crate::domain::ports::{DocumentStore, PdfRenderer};
use crate::utils::error::{CvError, Result};
use crate::utils::logger::Reporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

/// 展開輸入：含 `*`、`?` 或 `[` 時視為 glob，結果依路徑排序
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let entries = glob::glob(pattern).map_err(|e| CvError::InvalidConfigValueError {
        field: "input".to_string(),
        value: pattern.to_string(),
        reason: format!("Invalid glob pattern: {}", e),
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("⚠️ Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    Ok(matches)
}

/// Pairs each input with its PDF path. The output argument is a directory
/// when it ends with `/` or when there are several inputs.
pub fn resolve_outputs(inputs: &[PathBuf], output: &str) -> Vec<(PathBuf, PathBuf)> {
    let is_directory = output.ends_with('/') || inputs.len() > 1;

    inputs
        .iter()
        .map(|input| {
            let target = if is_directory {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "resume".to_string());
                Path::new(output).join(format!("{stem}.pdf"))
            } else {
                PathBuf::from(output)
            };
            (input.clone(), target)
        })
        .collect()
}

/// CSS 檔不存在時警告並回傳空字串
pub fn load_css<S: DocumentStore + ?Sized>(store: &S, path: &Path) -> String {
    if !store.exists(path) {
        tracing::warn!("⚠️ CSS file not found at {}", path.display());
        return String::new();
    }
    store.read_to_string(path).unwrap_or_else(|e| {
        tracing::warn!("⚠️ Failed to read CSS: {}", e);
        String::new()
    })
}

/// Everything a single render needs, shared by the concurrent tasks.
pub struct RenderContext<S: DocumentStore, R: PdfRenderer> {
    pub store: S,
    pub renderer: R,
    pub template: CvTemplate,
    pub defaults: RenderDefaults,
    pub css: String,
    pub page_css: String,
}

impl<S: DocumentStore, R: PdfRenderer> RenderContext<S, R> {
    pub fn html_for(&self, input: &Path) -> Result<String> {
        let resume = load_document(&self.store, input)?;
        let data = TemplateData::from_resume(&resume, &self.defaults);
        self.template.render(&data, &self.css, &self.page_css)
    }

    pub async fn render_document(&self, input: &Path, output: &Path) -> RenderOutcome {
        let result = match self.html_for(input) {
            Ok(html) => self.renderer.render(&html, output).await,
            Err(e) => Err(e),
        };

        RenderOutcome {
            file: input.to_path_buf(),
            output: output.to_path_buf(),
            error: result.err().map(|e| e.to_string()),
        }
    }
}

/// Renders documents in fixed-size chunks; the documents of one chunk run
/// concurrently.
pub struct BatchRunner<S: DocumentStore, R: PdfRenderer> {
    context: Arc<RenderContext<S, R>>,
    parallel: usize,
    reporter: Reporter,
}

impl<S, R> BatchRunner<S, R>
where
    S: DocumentStore + 'static,
    R: PdfRenderer + 'static,
{
    pub fn new(context: RenderContext<S, R>, parallel: usize, reporter: Reporter) -> Self {
        Self {
            context: Arc::new(context),
            parallel: parallel.max(1),
            reporter,
        }
    }

    pub async fn run(&self, jobs: Vec<(PathBuf, PathBuf)>) -> BatchSummary {
        self.reporter
            .info(format!("📄 Generating {} PDF(s)...\n", jobs.len()));

        let mut outcomes = Vec::with_capacity(jobs.len());
        for (chunk_index, chunk) in jobs.chunks(self.parallel).enumerate() {
            tracing::debug!("Starting chunk {} ({} documents)", chunk_index, chunk.len());

            let mut tasks = JoinSet::new();
            for (index, (input, output)) in chunk.iter().cloned().enumerate() {
                let context = Arc::clone(&self.context);
                tasks.spawn(async move {
                    let outcome = context.render_document(&input, &output).await;
                    (index, outcome)
                });
            }

            let mut finished = Vec::with_capacity(chunk.len());
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(result) => finished.push(result),
                    Err(e) => tracing::error!("❌ Render task aborted: {}", e),
                }
            }
            finished.sort_by_key(|(index, _)| *index);

            for (index, (input, output)) in chunk.iter().enumerate() {
                let outcome = match finished.iter().position(|(i, _)| *i == index) {
                    Some(pos) => finished[pos].1.clone(),
                    None => RenderOutcome {
                        file: input.clone(),
                        output: output.clone(),
                        error: Some("render task aborted".to_string()),
                    },
                };
                self.report(&outcome);
                outcomes.push(outcome);
            }
        }

        let summary = BatchSummary { outcomes };
        self.reporter.info(format!("\n{}", summary.message()));
        summary
    }

    fn report(&self, outcome: &RenderOutcome) {
        let name = outcome
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.file.display().to_string());

        match &outcome.error {
            None => self
                .reporter
                .info(format!("✅ {} → {}", name, outcome.output.display())),
            Some(error) => self.reporter.error(format!("✗ {}: {}", name, error)),
        }
    }
}
