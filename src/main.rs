use clap::Parser;
use cvforge::utils::{logger, validation::Validate};
use cvforge::{CliConfig, ConvertEngine, CvError, LocalStorage};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(&config.log_config());
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let to_stdout = config.output.is_none();
    let engine = ConvertEngine::new(LocalStorage::new(), config);

    match engine.run() {
        Ok(output) => {
            if to_stdout {
                print!("{}", output);
            }
        }
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &CvError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code().max(1));
}
