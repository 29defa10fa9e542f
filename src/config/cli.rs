use crate::domain::ports::DocumentStore;
use crate::utils::error::{CvError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 本機檔案系統
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for LocalStorage {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| CvError::DocumentReadError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)
        };

        write().map_err(|source| CvError::OutputWriteError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        })
    }
}
