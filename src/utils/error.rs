use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    DocumentReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    DocumentParseError { path: PathBuf, message: String },

    #[error("{} does not contain a JSON object at the top level", path.display())]
    NotAMappingError { path: PathBuf },

    #[error("Failed to write {}: {source}", path.display())]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No files found matching: {pattern}")]
    NoInputFilesError { pattern: String },

    #[error("Render failed for {}: {message}", file.display())]
    RenderError { file: PathBuf, message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CvError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CvError::DocumentReadError { .. }
            | CvError::DocumentParseError { .. }
            | CvError::NotAMappingError { .. }
            | CvError::NoInputFilesError { .. } => ErrorCategory::Input,
            CvError::IoError(_)
            | CvError::SerializationError(_)
            | CvError::OutputWriteError { .. } => ErrorCategory::Output,
            CvError::ConfigError { .. } | CvError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CvError::RenderError { .. } | CvError::TemplateError { .. } => ErrorCategory::Render,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CvError::IoError(_) | CvError::SerializationError(_) => ErrorSeverity::Critical,
            CvError::RenderError { .. } => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    /// 依錯誤分類給出建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CvError::DocumentReadError { .. } => "Check that the file exists and is readable",
            CvError::DocumentParseError { .. } => "Fix the JSON5 syntax error reported above",
            CvError::NotAMappingError { .. } => {
                "Wrap the resume fields in a top-level { ... } object"
            }
            CvError::NoInputFilesError { .. } => "Check the input path or glob pattern",
            CvError::OutputWriteError { .. } | CvError::IoError(_) => {
                "Check that the output location is writable"
            }
            CvError::SerializationError(_) => "Report this as a bug with the input that caused it",
            CvError::ConfigError { .. } | CvError::InvalidConfigValueError { .. } => {
                "Review the command line flags and config file"
            }
            CvError::RenderError { .. } => {
                "Make sure a Chromium-based browser is installed or set [browser].executable"
            }
            CvError::TemplateError { .. } => "Report this as a bug with the input that caused it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input error: {}", self),
            ErrorCategory::Output => format!("Output error: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Render => format!("PDF rendering failed: {}", self),
        }
    }

    /// 對應 CLI 的結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_path_and_message() {
        let err = CvError::DocumentParseError {
            path: PathBuf::from("cv/en.json5"),
            message: "unexpected '}'".to_string(),
        };

        assert_eq!(err.to_string(), "Failed to parse cv/en.json5: unexpected '}'");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_severity_exit_codes() {
        let io = CvError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert_eq!(io.exit_code(), 3);

        let render = CvError::RenderError {
            file: PathBuf::from("a.json5"),
            message: "browser exited with 1".to_string(),
        };
        assert_eq!(render.category(), ErrorCategory::Render);
        assert!(render.user_friendly_message().starts_with("PDF rendering failed"));
        assert_eq!(render.exit_code(), 2);

        let template = CvError::TemplateError {
            message: "unclosed block".to_string(),
        };
        assert_eq!(template.category(), ErrorCategory::Render);
        assert_eq!(template.exit_code(), 1);
    }
}
