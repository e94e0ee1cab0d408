//! System files tracked by flashback
//!
//! Each file is archived under its basename, so the basenames requested in
//! one invocation must be unique.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FlashbackError, FlashbackResult};

/// Files archived when the operator does not name any
pub const DEFAULT_SYSTEM_FILES: &[&str] =
    &["/etc/passwd", "/etc/shadow", "/etc/group", "/etc/gshadow"];

/// A live file and the key it is archived under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFile {
    /// Archive key (basename of the live path)
    pub basename: String,
    /// Canonical live path on every host
    pub live_path: PathBuf,
}

impl SystemFile {
    /// Build from a full path; `None` when the path has no directory part
    pub fn from_path(full_path: &str) -> Option<Self> {
        let full_path = full_path.trim();
        if !full_path.contains('/') {
            return None;
        }
        let path = Path::new(full_path);
        let basename = path.file_name()?.to_string_lossy().to_string();
        Some(Self {
            basename,
            live_path: path.to_path_buf(),
        })
    }

    /// Location of this file inside the snapshot directory for `date`
    pub fn archived_path(&self, archive_dir: &Path, date: &str) -> PathBuf {
        archive_dir.join(date).join(&self.basename)
    }
}

/// Ordered set of system files with unique basenames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemFileSet {
    files: Vec<SystemFile>,
}

impl SystemFileSet {
    /// Build the set from full paths, preserving order
    ///
    /// Entries without a directory component are skipped. Two paths sharing a
    /// basename would overwrite each other in the archive and are rejected.
    pub fn from_paths<I, S>(paths: I) -> FlashbackResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files: Vec<SystemFile> = Vec::new();
        for raw in paths {
            let raw = raw.as_ref();
            let Some(file) = SystemFile::from_path(raw) else {
                tracing::warn!(path = raw, "ignoring system file without a directory");
                continue;
            };
            if let Some(existing) = files.iter().find(|f| f.basename == file.basename) {
                if existing.live_path == file.live_path {
                    continue;
                }
                return Err(FlashbackError::Config(format!(
                    "{} and {} share the archive name '{}'",
                    existing.live_path.display(),
                    file.live_path.display(),
                    file.basename
                )));
            }
            files.push(file);
        }
        Ok(Self { files })
    }

    /// The built-in default file list
    pub fn defaults() -> Self {
        // The default list has unique basenames
        Self::from_paths(DEFAULT_SYSTEM_FILES).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a file by its archive key
    pub fn get(&self, basename: &str) -> Option<&SystemFile> {
        self.files.iter().find(|f| f.basename == basename)
    }
}

impl<'a> IntoIterator for &'a SystemFileSet {
    type Item = &'a SystemFile;
    type IntoIter = std::slice::Iter<'a, SystemFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
