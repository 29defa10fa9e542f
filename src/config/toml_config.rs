use crate::utils::error::{CvError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// `cv2pdf` 的設定檔，每個區段皆可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub browser: BrowserConfig,
    pub page: PageConfig,
    pub paths: PathsConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub executable: String,
    pub extra_args: Vec<String>,
    pub timeout_seconds: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: "chromium".to_string(),
            extra_args: Vec::new(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub format: String,
    pub print_background: bool,
    pub margin: MarginConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            format: "A4".to_string(),
            print_background: true,
            margin: MarginConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: "6mm".to_string(),
            bottom: "6mm".to_string(),
            left: "8mm".to_string(),
            right: "8mm".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub css: PathBuf,
    pub defaults: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            css: PathBuf::from("styles/cv.css"),
            defaults: PathBuf::from("defaults.json5"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub parallel: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallel: 2 }
    }
}

/// Command line values that take precedence over the TOML file.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    pub parallel: Option<usize>,
    pub browser: Option<String>,
    pub css: Option<PathBuf>,
    pub defaults: Option<PathBuf>,
}

const PAGE_FORMATS: &[&str] = &["A3", "A4", "A5", "Letter", "Legal", "Tabloid"];

impl RenderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CvError::DocumentReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CvError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CHROME_PATH})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 套用命令列覆蓋設定
    pub fn apply(&mut self, overrides: &RenderOverrides) {
        if let Some(parallel) = overrides.parallel {
            self.batch.parallel = parallel;
        }
        if let Some(browser) = &overrides.browser {
            self.browser.executable = browser.clone();
        }
        if let Some(css) = &overrides.css {
            self.paths.css = css.clone();
        }
        if let Some(defaults) = &overrides.defaults {
            self.paths.defaults = defaults.clone();
        }
    }

    /// The `--dry-run` report: effective settings, then one line per job.
    pub fn dry_run_report(&self, jobs: &[(PathBuf, PathBuf)]) -> String {
        let page_rule = self.page_css();
        let mut lines = vec![
            "🔍 Dry Run Analysis:".to_string(),
            format!("  Browser: {}", self.browser.executable),
            format!(
                "  Page: {} ({})",
                self.page.format,
                page_rule.lines().next().unwrap_or_default()
            ),
            format!("  CSS: {}", self.paths.css.display()),
            format!("  Defaults: {}", self.paths.defaults.display()),
            format!("  Parallel: {}", self.batch.parallel),
            String::new(),
        ];
        lines.extend(
            jobs.iter()
                .map(|(input, output)| format!("  {} -> {}", input.display(), output.display())),
        );
        lines.join("\n")
    }

    /// `@page` 規則，頁面大小與邊距由 CSS 控制
    pub fn page_css(&self) -> String {
        let margin = &self.page.margin;
        let mut css = format!(
            "@page {{ size: {}; margin: {} {} {} {}; }}",
            self.page.format, margin.top, margin.right, margin.bottom, margin.left
        );
        if self.page.print_background {
            css.push_str("\nhtml { -webkit-print-color-adjust: exact; print-color-adjust: exact; }");
        }
        css
    }
}

impl Validate for RenderConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("browser.executable", &self.browser.executable)?;
        validation::validate_positive_number(
            "browser.timeout_seconds",
            self.browser.timeout_seconds as usize,
            1,
        )?;
        validation::validate_positive_number("batch.parallel", self.batch.parallel, 1)?;

        if !PAGE_FORMATS.contains(&self.page.format.as_str()) {
            return Err(CvError::InvalidConfigValueError {
                field: "page.format".to_string(),
                value: self.page.format.clone(),
                reason: format!("Unsupported format. Valid formats: {}", PAGE_FORMATS.join(", ")),
            });
        }

        let margin = &self.page.margin;
        validation::validate_css_length("page.margin.top", &margin.top)?;
        validation::validate_css_length("page.margin.bottom", &margin.bottom)?;
        validation::validate_css_length("page.margin.left", &margin.left)?;
        validation::validate_css_length("page.margin.right", &margin.right)?;

        validation::validate_path("paths.css", &self.paths.css.to_string_lossy())?;
        validation::validate_path("paths.defaults", &self.paths.defaults.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RenderConfig::from_toml_str("").unwrap();

        assert_eq!(config.browser.executable, "chromium");
        assert_eq!(config.page.format, "A4");
        assert_eq!(config.page.margin, MarginConfig::default());
        assert_eq!(config.batch.parallel, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[browser]
executable = "google-chrome"
extra_args = ["--no-sandbox"]

[page.margin]
left = "10mm"

[batch]
parallel = 4
"#;

        let config = RenderConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.browser.executable, "google-chrome");
        assert_eq!(config.browser.extra_args, vec!["--no-sandbox"]);
        assert_eq!(config.browser.timeout_seconds, 60);
        assert_eq!(config.page.margin.left, "10mm");
        assert_eq!(config.page.margin.top, "6mm");
        assert_eq!(config.batch.parallel, 4);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CVFORGE_TEST_BROWSER", "/opt/chrome/chrome");

        let toml_content = r#"
[browser]
executable = "${CVFORGE_TEST_BROWSER}"
"#;

        let config = RenderConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.browser.executable, "/opt/chrome/chrome");

        std::env::remove_var("CVFORGE_TEST_BROWSER");
    }

    #[test]
    fn test_config_validation() {
        let bad_margin = RenderConfig::from_toml_str("[page.margin]\ntop = \"wide\"\n").unwrap();
        assert!(bad_margin.validate().is_err());

        let bad_parallel = RenderConfig::from_toml_str("[batch]\nparallel = 0\n").unwrap();
        assert!(bad_parallel.validate().is_err());

        let bad_format = RenderConfig::from_toml_str("[page]\nformat = \"B7\"\n").unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_page_css() {
        let mut config = RenderConfig::default();
        assert!(config
            .page_css()
            .starts_with("@page { size: A4; margin: 6mm 8mm 6mm 8mm; }"));
        assert!(config.page_css().contains("print-color-adjust: exact"));

        config.page.print_background = false;
        assert_eq!(config.page_css(), "@page { size: A4; margin: 6mm 8mm 6mm 8mm; }");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let toml_content = "[batch]\nparallel = 4\n[paths]\ncss = \"a.css\"\n";
        let mut config = RenderConfig::from_toml_str(toml_content).unwrap();

        config.apply(&RenderOverrides {
            parallel: Some(1),
            browser: Some("google-chrome".to_string()),
            ..Default::default()
        });

        assert_eq!(config.batch.parallel, 1);
        assert_eq!(config.browser.executable, "google-chrome");
        assert_eq!(config.paths.css, PathBuf::from("a.css"));
        assert_eq!(config.paths.defaults, PathBuf::from("defaults.json5"));

        config.apply(&RenderOverrides {
            css: Some(PathBuf::from("print.css")),
            defaults: Some(PathBuf::from("me.json5")),
            ..Default::default()
        });
        assert_eq!(config.paths.css, PathBuf::from("print.css"));
        assert_eq!(config.paths.defaults, PathBuf::from("me.json5"));
        assert_eq!(config.batch.parallel, 1);
    }

    #[test]
    fn test_dry_run_report_lists_settings_and_jobs() {
        let config = RenderConfig::default();
        let jobs = vec![
            (PathBuf::from("cv/en.json5"), PathBuf::from("out/en.pdf")),
            (PathBuf::from("cv/es.json5"), PathBuf::from("out/es.pdf")),
        ];

        let report = config.dry_run_report(&jobs);
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines[0], "🔍 Dry Run Analysis:");
        assert_eq!(lines[1], "  Browser: chromium");
        assert_eq!(lines[2], "  Page: A4 (@page { size: A4; margin: 6mm 8mm 6mm 8mm; })");
        assert_eq!(lines[5], "  Parallel: 2");
        assert_eq!(lines[7], "  cv/en.json5 -> out/en.pdf");
        assert_eq!(lines[8], "  cv/es.json5 -> out/es.pdf");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[batch]\nparallel = 3\n").unwrap();

        let config = RenderConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.batch.parallel, 3);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = RenderConfig::from_toml_str("[batch\nparallel = 3").unwrap_err();
        assert!(matches!(err, CvError::ConfigError { .. }));
    }
}
