//! Path management for flashback
//!
//! Resolves where the controller keeps its own state: the settings file and
//! the operation journal. Archive directories live on the managed hosts and
//! are not resolved here.
//!
//! ## Path Resolution Order
//!
//! 1. `FLASHBACK_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/flashback` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FlashbackError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "FLASHBACK_CONFIG_DIR";

/// Manages all controller-side paths used by flashback
#[derive(Debug, Clone)]
pub struct FlashbackPaths {
    /// Base directory for settings and journal
    base_dir: PathBuf,
}

impl FlashbackPaths {
    /// Create a new FlashbackPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, FlashbackError> {
        let base_dir = if let Ok(custom) = std::env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "flashback")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    FlashbackError::Config("Could not determine a config directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create FlashbackPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the operation journal
    pub fn journal_file(&self) -> PathBuf {
        self.base_dir.join("journal.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), FlashbackError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            FlashbackError::Io(format!("Failed to create config directory: {}", e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FlashbackPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.journal_file(), temp_dir.path().join("journal.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("flashback");
        let paths = FlashbackPaths::with_base_dir(base.clone());

        paths.ensure_directories().unwrap();
        assert!(base.is_dir());
    }
}
