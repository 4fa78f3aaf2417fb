//! Storage layout configuration

use std::path::PathBuf;

use crate::filesys::file::File;

/// Directory name under the user's home
const DEFAULT_DIR_NAME: &str = ".velo-studio";

/// Storage layout for velo-studio
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    /// Create a new storage layout
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the API configuration file
    pub fn api_config_file(&self) -> File {
        File::new(self.base_dir.join("api_config.json"))
    }

    /// Get the settings file
    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Get the logs directory
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(DEFAULT_DIR_NAME))
    }
}
