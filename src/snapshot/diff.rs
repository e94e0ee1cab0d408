//! Diff engine for flashback
//!
//! Compares two versions of each system file on a host. Each side is picked
//! with a date selector and resolved independently, using the invocation's
//! single `today` for both.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::resolver::resolve;
use super::unified::{strip_control_sequences, unified_diff};
use crate::context::{HostContext, Invocation};
use crate::error::{Failure, FlashbackError, FlashbackResult};
use crate::executor::{OpOutput, Operation};
use crate::fleet::{FleetRunner, HostReport};
use crate::models::{DateToken, Host, ResolvedLocation, SystemFileSet};

/// Result of comparing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiffStatus {
    /// Both versions are identical; carries the two resolved labels
    NoDifference { first: String, second: String },
    /// Unified diff, with terminal escape sequences removed
    DiffText { text: String },
    /// One side could not be read
    Failed(Failure),
}

/// Outcome of diffing one file on one host
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub file: String,
    pub first: ResolvedLocation,
    pub second: ResolvedLocation,
    pub status: DiffStatus,
}

/// Compares resolved file versions
pub struct DiffEngine {
    archive_dir: PathBuf,
}

impl DiffEngine {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    /// Diff every file on the context's host
    ///
    /// A file that cannot be read on either side is reported as failed and
    /// the remaining files are still compared.
    pub fn diff(
        &self,
        ctx: &HostContext<'_>,
        files: &SystemFileSet,
        first: DateToken,
        second: DateToken,
    ) -> Vec<DiffReport> {
        files
            .iter()
            .map(|file| {
                let first = resolve(
                    first,
                    ctx.today,
                    &self.archive_dir,
                    &file.basename,
                    &file.live_path,
                );
                let second = resolve(
                    second,
                    ctx.today,
                    &self.archive_dir,
                    &file.basename,
                    &file.live_path,
                );
                let status = match compare(ctx, &first, &second) {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::warn!(
                            host = %ctx.host,
                            file = %file.basename,
                            "diff {} vs {} failed: {}",
                            first,
                            second,
                            e
                        );
                        DiffStatus::Failed(e.into())
                    }
                };
                DiffReport {
                    file: file.basename.clone(),
                    first,
                    second,
                    status,
                }
            })
            .collect()
    }

    /// Diff every file on every host
    pub fn diff_fleet(
        &self,
        runner: &FleetRunner,
        hosts: &[Host],
        invocation: &Invocation,
        files: &SystemFileSet,
        first: DateToken,
        second: DateToken,
    ) -> Vec<HostReport<Vec<DiffReport>>> {
        runner.run(hosts, invocation.today, |ctx| {
            self.diff(ctx, files, first, second)
        })
    }
}

fn compare(
    ctx: &HostContext<'_>,
    first: &ResolvedLocation,
    second: &ResolvedLocation,
) -> FlashbackResult<DiffStatus> {
    let first_bytes = read(ctx, first.path())?;
    let second_bytes = read(ctx, second.path())?;

    let no_difference = || DiffStatus::NoDifference {
        first: first.label(),
        second: second.label(),
    };
    if first_bytes == second_bytes {
        return Ok(no_difference());
    }

    let old = String::from_utf8_lossy(&first_bytes);
    let new = String::from_utf8_lossy(&second_bytes);
    match unified_diff(&old, &new, &first.to_string(), &second.to_string()) {
        Some(text) => Ok(DiffStatus::DiffText {
            text: strip_control_sequences(&text),
        }),
        None => Ok(no_difference()),
    }
}

fn read(ctx: &HostContext<'_>, path: &Path) -> FlashbackResult<Vec<u8>> {
    match ctx.execute(&Operation::ReadFile {
        path: path.to_path_buf(),
    })? {
        OpOutput::Contents(bytes) => Ok(bytes),
        other => Err(FlashbackError::Io(format!(
            "unexpected executor output for {}: {:?}",
            path.display(),
            other
        ))),
    }
}
