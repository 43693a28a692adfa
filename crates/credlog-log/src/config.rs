//! # Store Configuration
//!
//! Where the log lives. Defaults suit a local run; environment variables
//! override them for deployed holders.

use std::path::{Path, PathBuf};

use credlog_fs::TEMP_FILE_PREFIX;

use crate::error::LogError;

/// Environment variable overriding [`StoreConfig::storage_dir`].
pub const STORAGE_DIR_ENV: &str = "CREDLOG_STORAGE_DIR";

/// Environment variable overriding [`StoreConfig::file_name`].
pub const LOG_FILE_ENV: &str = "CREDLOG_LOG_FILE";

/// Configuration of a [`LogStore`](crate::store::LogStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the log file. Created owner-only if missing.
    pub storage_dir: PathBuf,
    /// Name of the log file inside `storage_dir`.
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./credlog"),
            file_name: "logs.json".to_string(),
        }
    }
}

impl StoreConfig {
    /// Defaults, overridden by `CREDLOG_STORAGE_DIR` and `CREDLOG_LOG_FILE`
    /// when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(STORAGE_DIR_ENV).filter(|v| !v.is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(LOG_FILE_ENV).filter(|v| !v.is_empty()) {
            config.file_name = name;
        }
        config
    }

    /// Defaults with a different storage directory.
    pub fn with_storage_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.storage_dir.join(&self.file_name)
    }

    /// Reject file names that escape the directory or that the orphan
    /// sweep would delete.
    pub fn validate(&self) -> Result<(), LogError> {
        let name = Path::new(&self.file_name);
        let plain = name.file_name().is_some_and(|n| n == name.as_os_str());
        if self.file_name.is_empty() || !plain {
            return Err(LogError::Config(format!(
                "log file name {:?} must be a plain file name",
                self.file_name
            )));
        }
        if self.file_name.starts_with(TEMP_FILE_PREFIX) {
            return Err(LogError::Config(format!(
                "log file name {:?} uses the reserved prefix {TEMP_FILE_PREFIX}",
                self.file_name
            )));
        }
        Ok(())
    }
}
