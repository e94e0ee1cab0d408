//! Operator settings for flashback
//!
//! Every field has a default, so a missing or partial `config.json` still
//! loads. Command-line flags override whatever is stored here.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths::FlashbackPaths;
use crate::error::FlashbackError;
use crate::models::system_file::DEFAULT_SYSTEM_FILES;
use crate::snapshot::PostRecoverPolicy;

/// Default archive root on each host. Sensitive files such as /etc/shadow
/// end up here, so it must stay root-only.
pub const DEFAULT_ARCHIVE_DIRECTORY: &str = "/root/.flashback";

/// Default number of hosts worked on concurrently
pub const DEFAULT_WORKERS: usize = 10;

/// How hosts are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Through the system `ssh` client
    #[default]
    Ssh,
    /// Directly on this machine's filesystem
    Local,
}

/// Options passed to the ssh client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshSettings {
    /// ssh binary to invoke
    #[serde(default = "default_ssh_binary")]
    pub binary: String,

    /// Remote login user (ssh config decides when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Remote port (ssh config decides when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Run remote operations through sudo
    #[serde(default = "default_sudo")]
    pub sudo: bool,

    /// Extra `-o` options, e.g. `StrictHostKeyChecking=accept-new`
    #[serde(default)]
    pub options: Vec<String>,
}

fn default_ssh_binary() -> String {
    "ssh".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_sudo() -> bool {
    true
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            binary: default_ssh_binary(),
            user: None,
            port: None,
            connect_timeout_secs: default_connect_timeout(),
            sudo: default_sudo(),
            options: Vec::new(),
        }
    }
}

/// Operator settings for flashback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Archive root on every host
    #[serde(default = "default_archive_directory")]
    pub archive_directory: PathBuf,

    /// Files to operate on when none are given on the command line
    #[serde(default = "default_system_files")]
    pub system_files: Vec<String>,

    /// Hosts worked on concurrently (1 serializes)
    #[serde(default = "default_workers")]
    pub parallel_workers: usize,

    /// How hosts are reached
    #[serde(default)]
    pub transport: TransportKind,

    /// ssh client options
    #[serde(default)]
    pub ssh: SshSettings,

    /// When the post-recover command runs
    #[serde(default)]
    pub post_recover_policy: PostRecoverPolicy,

    /// Record every outcome in the journal
    #[serde(default = "default_journal_enabled")]
    pub journal_enabled: bool,

    /// Template used by `report --format text` instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_template: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_archive_directory() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_DIRECTORY)
}

fn default_system_files() -> Vec<String> {
    DEFAULT_SYSTEM_FILES.iter().map(|s| s.to_string()).collect()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_journal_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            archive_directory: default_archive_directory(),
            system_files: default_system_files(),
            parallel_workers: default_workers(),
            transport: TransportKind::default(),
            ssh: SshSettings::default(),
            post_recover_policy: PostRecoverPolicy::default(),
            journal_enabled: default_journal_enabled(),
            report_template: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &FlashbackPaths) -> Result<Self, FlashbackError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FlashbackError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FlashbackError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FlashbackPaths) -> Result<(), FlashbackError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FlashbackError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            FlashbackError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.archive_directory, PathBuf::from("/root/.flashback"));
        assert_eq!(settings.parallel_workers, 10);
        assert_eq!(settings.transport, TransportKind::Ssh);
        assert_eq!(settings.system_files.len(), 4);
        assert_eq!(settings.post_recover_policy, PostRecoverPolicy::Always);
        assert!(settings.ssh.sudo);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FlashbackPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.parallel_workers = 3;
        settings.transport = TransportKind::Local;
        settings.ssh.port = Some(2222);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.parallel_workers, 3);
        assert_eq!(loaded.transport, TransportKind::Local);
        assert_eq!(loaded.ssh.port, Some(2222));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FlashbackPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"archive_directory": "/srv/fb"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.archive_directory, PathBuf::from("/srv/fb"));
        assert_eq!(loaded.parallel_workers, DEFAULT_WORKERS);
        assert!(loaded.journal_enabled);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FlashbackPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, FlashbackError::Config(_)));
    }
}
