//! Runtime configuration for the `studentdb` binary.
//!
//! Values come from flags or their environment variables (via clap);
//! anything unset falls back to locations next to the executable.

use std::path::{Path, PathBuf};
use studentdb_core::default_log_level;

pub const DEFAULT_DB_FILE_NAME: &str = "StudentManagement.db";
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Always absolute; the logger rejects relative directories.
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        let app_dir = app_dir();
        let db_path = db_path.unwrap_or_else(|| app_dir.join(DEFAULT_DB_FILE_NAME));
        let log_dir = log_dir.unwrap_or_else(|| app_dir.join(DEFAULT_LOG_DIR_NAME));
        let log_level = log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_dir: absolutize(&log_dir),
            log_level,
        }
    }
}

/// Directory holding the running binary, or the working directory.
fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
