pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::serialize::{OutputMode, DEFAULT_SCHEMA_URL};
    use crate::domain::ports::ConvertConfig;
    use crate::utils::error::Result;
    use crate::utils::logger::{LogConfig, LogFormat};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "json5schema")]
    #[command(about = "Convert a version JSON5 file into JSON Resume format")]
    pub struct CliConfig {
        /// Path to the source JSON5 file
        pub input: PathBuf,

        /// Destination JSON5 file (defaults to stdout)
        pub output: Option<PathBuf>,

        /// Schema reference comment to include in the output
        #[arg(long, default_value = DEFAULT_SCHEMA_URL)]
        pub schema_url: String,

        /// Optional JSON5 file with defaults to merge into the input before converting
        #[arg(long)]
        pub merge: Option<PathBuf>,

        /// Emit strict JSON instead of JSON5 (omits header comments)
        #[arg(long)]
        pub json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(short, long, help = "Only log warnings and errors")]
        pub quiet: bool,

        #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
        pub log_format: LogFormat,
    }

    impl CliConfig {
        pub fn log_config(&self) -> LogConfig {
            LogConfig {
                verbose: self.verbose,
                quiet: self.quiet,
                format: self.log_format,
            }
        }
    }

    impl ConvertConfig for CliConfig {
        fn input(&self) -> &Path {
            &self.input
        }

        fn output(&self) -> Option<&Path> {
            self.output.as_deref()
        }

        fn merge_path(&self) -> Option<&Path> {
            self.merge.as_deref()
        }

        fn schema_url(&self) -> &str {
            &self.schema_url
        }

        fn output_mode(&self) -> OutputMode {
            if self.json {
                OutputMode::Json
            } else {
                OutputMode::Json5
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("input", &self.input.to_string_lossy())?;
            if let Some(output) = &self.output {
                validation::validate_path("output", &output.to_string_lossy())?;
            }
            if let Some(merge) = &self.merge {
                validation::validate_path("--merge", &merge.to_string_lossy())?;
            }
            validation::validate_url("--schema-url", &self.schema_url)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_defaults() {
            let config = CliConfig::try_parse_from(["json5schema", "cv/en.json5"]).unwrap();

            assert_eq!(config.input, PathBuf::from("cv/en.json5"));
            assert!(config.output.is_none());
            assert_eq!(config.schema_url, "https://jsonresume.org/schema");
            assert_eq!(config.output_mode(), OutputMode::Json5);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_parse_all_flags() {
            let config = CliConfig::try_parse_from([
                "json5schema",
                "cv/en.json5",
                "out/en.json",
                "--merge",
                "defaults.json5",
                "--json",
                "--schema-url",
                "https://example.com/schema",
                "--log-format",
                "json",
            ])
            .unwrap();

            assert_eq!(config.output(), Some(Path::new("out/en.json")));
            assert_eq!(config.merge_path(), Some(Path::new("defaults.json5")));
            assert_eq!(config.output_mode(), OutputMode::Json);
            assert_eq!(config.log_config().format, LogFormat::Json);
        }

        #[test]
        fn test_invalid_schema_url_rejected() {
            let config =
                CliConfig::try_parse_from(["json5schema", "a.json5", "--schema-url", "schema"])
                    .unwrap();
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_input_is_required() {
            assert!(CliConfig::try_parse_from(["json5schema"]).is_err());
        }
    }
}
