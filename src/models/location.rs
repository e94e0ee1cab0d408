//! Resolved file locations
//!
//! A date selector resolves either to the live file or to one archived
//! snapshot of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::date::{SnapshotDate, CURRENT_LABEL};

/// Where one side of a comparison (or a recovery source) lives on a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedLocation {
    /// The live file at its canonical path
    Live { path: PathBuf },
    /// An archived copy under `<archive>/<date>/<basename>`
    Snapshot { date: SnapshotDate, path: PathBuf },
}

impl ResolvedLocation {
    /// Path to read on the host
    pub fn path(&self) -> &Path {
        match self {
            ResolvedLocation::Live { path } => path,
            ResolvedLocation::Snapshot { path, .. } => path,
        }
    }

    /// Label shown to the operator: the snapshot date or `current`
    pub fn label(&self) -> String {
        match self {
            ResolvedLocation::Live { .. } => CURRENT_LABEL.to_string(),
            ResolvedLocation::Snapshot { date, .. } => date.to_string(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ResolvedLocation::Live { .. })
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path().display(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let live = ResolvedLocation::Live {
            path: PathBuf::from("/etc/passwd"),
        };
        assert_eq!(live.label(), "current");
        assert!(live.is_live());

        let snap = ResolvedLocation::Snapshot {
            date: SnapshotDate::parse("20260101").unwrap(),
            path: PathBuf::from("/root/.flashback/20260101/passwd"),
        };
        assert_eq!(snap.label(), "20260101");
        assert_eq!(snap.path(), Path::new("/root/.flashback/20260101/passwd"));
        assert_eq!(
            snap.to_string(),
            "/root/.flashback/20260101/passwd (20260101)"
        );
    }
}
