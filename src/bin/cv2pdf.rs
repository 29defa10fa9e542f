use clap::Parser;
use cvforge::core::batch::{expand_inputs, load_css, resolve_outputs, RenderContext};
use cvforge::config::toml_config::RenderOverrides;
use cvforge::core::template::{CvTemplate, RenderDefaults};
use cvforge::utils::logger::{self, LogConfig, LogFormat, Reporter};
use cvforge::utils::validation::Validate;
use cvforge::{BatchRunner, ChromeRenderer, CvError, LocalStorage, RenderConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cv2pdf")]
#[command(about = "Generate PDFs from JSON/JSON5 resume files")]
#[command(after_help = "Examples:
  cv2pdf resume.json5 output.pdf
  cv2pdf 'cvs/*.json5' output/
  cv2pdf 'cvs/*.json5' output/ --parallel 3 --quiet")]
struct Args {
    /// Input resume file or glob pattern
    input: String,

    /// Output PDF file or directory
    output: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of PDFs to generate in parallel (overrides [batch].parallel)
    #[arg(long)]
    parallel: Option<usize>,

    /// Browser executable (overrides [browser].executable)
    #[arg(long)]
    browser: Option<String>,

    /// Stylesheet to inline (overrides [paths].css)
    #[arg(long)]
    css: Option<PathBuf>,

    /// Defaults JSON5 file (overrides [paths].defaults)
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Suppress logging output
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Show what would be generated without launching the browser
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn overrides(&self) -> RenderOverrides {
        RenderOverrides {
            parallel: self.parallel,
            browser: self.browser.clone(),
            css: self.css.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let reporter = Reporter::new(args.quiet);

    logger::init_cli_logger(&LogConfig {
        verbose: args.verbose,
        quiet: args.quiet,
        format: args.log_format,
    });

    // 載入 TOML 配置，未指定時使用預設值
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            match RenderConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => exit_with(&reporter, &e),
            }
        }
        None => RenderConfig::default(),
    };

    // 應用命令列覆蓋設定
    config.apply(&args.overrides());

    if let Err(e) = config.validate() {
        exit_with(&reporter, &e);
    }

    let inputs = match expand_inputs(&args.input) {
        Ok(inputs) if inputs.is_empty() => exit_with(
            &reporter,
            &CvError::NoInputFilesError {
                pattern: args.input.clone(),
            },
        ),
        Ok(inputs) => inputs,
        Err(e) => exit_with(&reporter, &e),
    };
    let jobs = resolve_outputs(&inputs, &args.output);

    if args.dry_run {
        println!("{}", config.dry_run_report(&jobs));
        return;
    }

    let template = match CvTemplate::new() {
        Ok(template) => template,
        Err(e) => exit_with(&reporter, &e),
    };
    let storage = LocalStorage::new();
    let defaults = RenderDefaults::load(&storage, &config.paths.defaults);
    let css = load_css(&storage, &config.paths.css);

    reporter.info("🌐 Initializing browser...");
    let context = RenderContext {
        store: storage,
        renderer: ChromeRenderer::new(&config.browser),
        template,
        defaults,
        css,
        page_css: config.page_css(),
    };

    let runner = BatchRunner::new(context, config.batch.parallel, reporter);
    let summary = runner.run(jobs).await;

    if summary.failed() > 0 {
        std::process::exit(1);
    }
}

fn exit_with(reporter: &Reporter, e: &CvError) -> ! {
    tracing::error!(
        "❌ cv2pdf failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    reporter.error(format!("❌ Error: {}", e.user_friendly_message()));
    reporter.error(format!("💡 {}", e.recovery_suggestion()));
    std::process::exit(e.exit_code().max(1));
}
