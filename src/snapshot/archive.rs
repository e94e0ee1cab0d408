//! Archive manager for flashback
//!
//! Copies live system files into today's snapshot directory on each host.
//! A file is only copied when the snapshot copy is missing or older than the
//! live file, so archiving repeatedly on the same day is cheap and safe.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::{HostContext, Invocation};
use crate::error::Failure;
use crate::executor::{OpOutput, Operation};
use crate::fleet::{FleetRunner, HostReport};
use crate::models::{Host, SnapshotDate, SystemFileSet};

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArchiveStatus {
    /// The live file was copied into the snapshot
    Copied,
    /// The snapshot copy was already current
    Skipped,
    /// The copy failed
    Failed(Failure),
}

/// Outcome of archiving one file on one host
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub file: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: ArchiveStatus,
}

/// Creates per-host snapshots
pub struct ArchiveManager {
    archive_dir: PathBuf,
}

impl ArchiveManager {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Directory holding the snapshot for `date`
    pub fn snapshot_dir(&self, date: SnapshotDate) -> PathBuf {
        self.archive_dir.join(date.as_str())
    }

    /// Archive `files` on the context's host into today's snapshot
    pub fn archive(&self, ctx: &HostContext<'_>, files: &SystemFileSet) -> Vec<ArchiveReport> {
        let snapshot_dir = self.snapshot_dir(ctx.today);

        let dir_failure = match ctx.execute(&Operation::EnsureDir {
            path: snapshot_dir.clone(),
        }) {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    host = %ctx.host,
                    dir = %snapshot_dir.display(),
                    "cannot create snapshot directory: {}",
                    e
                );
                Some(Failure::from(e))
            }
        };

        files
            .iter()
            .map(|file| {
                let destination = file.archived_path(&self.archive_dir, ctx.today.as_str());
                let status = match &dir_failure {
                    Some(failure) => ArchiveStatus::Failed(failure.clone()),
                    None => self.copy_one(ctx, &file.live_path, &destination),
                };
                ArchiveReport {
                    file: file.basename.clone(),
                    source: file.live_path.clone(),
                    destination,
                    status,
                }
            })
            .collect()
    }

    fn copy_one(&self, ctx: &HostContext<'_>, source: &Path, destination: &Path) -> ArchiveStatus {
        let op = Operation::CopyIfNewer {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        };
        match ctx.execute(&op) {
            Ok(OpOutput::Skipped) => {
                tracing::debug!(host = %ctx.host, file = %source.display(), "already archived");
                ArchiveStatus::Skipped
            }
            Ok(_) => {
                tracing::info!(host = %ctx.host, file = %source.display(), "archived");
                ArchiveStatus::Copied
            }
            Err(e) => {
                tracing::warn!(host = %ctx.host, file = %source.display(), "archive failed: {}", e);
                ArchiveStatus::Failed(e.into())
            }
        }
    }

    /// Archive `files` on every host
    pub fn archive_fleet(
        &self,
        runner: &FleetRunner,
        hosts: &[Host],
        invocation: &Invocation,
        files: &SystemFileSet,
    ) -> Vec<HostReport<Vec<ArchiveReport>>> {
        runner.run(hosts, invocation.today, |ctx| self.archive(ctx, files))
    }
}
