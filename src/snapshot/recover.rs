//! Recover engine for flashback
//!
//! Restores live system files from a dated snapshot and optionally runs a
//! follow-up command on each host (for example to restart a service that
//! caches the user database).

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::context::{HostContext, Invocation};
use crate::error::Failure;
use crate::executor::Operation;
use crate::fleet::{FleetRunner, HostReport};
use crate::models::{Host, SnapshotDate, SystemFileSet};

/// When the post-recover command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PostRecoverPolicy {
    /// Run after the file loop whatever its outcome
    #[default]
    Always,
    /// Run only when every file on the host was restored
    OnSuccess,
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecoverStatus {
    Restored,
    /// Dry run; nothing was touched
    Simulated,
    Failed(Failure),
}

/// What happened to the post-recover command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandStatus {
    Executed,
    Simulated,
    /// Not run because a file failed under [`PostRecoverPolicy::OnSuccess`]
    Skipped,
    Failed(Failure),
}

/// Outcome of restoring one file on one host
#[derive(Debug, Clone, Serialize)]
pub struct RecoverReport {
    pub file: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub date: SnapshotDate,
    pub status: RecoverStatus,
}

/// Everything recover did on one host
#[derive(Debug, Clone, Serialize)]
pub struct HostRecovery {
    pub files: Vec<RecoverReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandStatus>,
}

impl HostRecovery {
    pub fn any_file_failed(&self) -> bool {
        self.files
            .iter()
            .any(|r| matches!(r.status, RecoverStatus::Failed(_)))
    }
}

/// Restores files from snapshots
pub struct RecoverManager {
    archive_dir: PathBuf,
}

impl RecoverManager {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    /// Restore `files` from the snapshot taken on `date` (today when `None`)
    ///
    /// In a dry run every file is reported as simulated and the executor is
    /// never called.
    pub fn recover(
        &self,
        ctx: &HostContext<'_>,
        files: &SystemFileSet,
        date: Option<SnapshotDate>,
        dry_run: bool,
    ) -> Vec<RecoverReport> {
        let date = date.unwrap_or(ctx.today);

        files
            .iter()
            .map(|file| {
                let source = file.archived_path(&self.archive_dir, date.as_str());
                let destination = file.live_path.clone();

                let status = if dry_run {
                    tracing::info!(
                        host = %ctx.host,
                        "dry run: would restore {} from {}",
                        destination.display(),
                        source.display()
                    );
                    RecoverStatus::Simulated
                } else {
                    let op = Operation::CopyOver {
                        source: source.clone(),
                        destination: destination.clone(),
                    };
                    match ctx.execute(&op) {
                        Ok(_) => {
                            tracing::info!(
                                host = %ctx.host,
                                file = %destination.display(),
                                date = %date,
                                "restored"
                            );
                            RecoverStatus::Restored
                        }
                        Err(e) => {
                            tracing::warn!(
                                host = %ctx.host,
                                file = %destination.display(),
                                "restore from {} failed: {}",
                                source.display(),
                                e
                            );
                            RecoverStatus::Failed(e.into())
                        }
                    }
                };

                RecoverReport {
                    file: file.basename.clone(),
                    source,
                    destination,
                    date,
                    status,
                }
            })
            .collect()
    }

    /// Run the operator's command once on the context's host
    pub fn post_recover_command(
        &self,
        ctx: &HostContext<'_>,
        command: &str,
        dry_run: bool,
    ) -> CommandStatus {
        if dry_run {
            tracing::info!(host = %ctx.host, "dry run: would run `{}`", command);
            return CommandStatus::Simulated;
        }

        match ctx.execute(&Operation::RunCommand {
            command: command.to_string(),
        }) {
            Ok(_) => {
                tracing::info!(host = %ctx.host, "ran `{}`", command);
                CommandStatus::Executed
            }
            Err(e) => {
                tracing::warn!(host = %ctx.host, "`{}` failed: {}", command, e);
                CommandStatus::Failed(e.into())
            }
        }
    }

    /// Restore files and then run the command, if any, under `policy`
    pub fn recover_host(
        &self,
        ctx: &HostContext<'_>,
        files: &SystemFileSet,
        date: Option<SnapshotDate>,
        dry_run: bool,
        command: Option<&str>,
        policy: PostRecoverPolicy,
    ) -> HostRecovery {
        let mut recovery = HostRecovery {
            files: self.recover(ctx, files, date, dry_run),
            command: None,
        };

        if let Some(command) = command {
            let status = if dry_run {
                CommandStatus::Simulated
            } else if policy == PostRecoverPolicy::OnSuccess && recovery.any_file_failed() {
                tracing::info!(host = %ctx.host, "skipping `{}` after failed restore", command);
                CommandStatus::Skipped
            } else {
                self.post_recover_command(ctx, command, dry_run)
            };
            recovery.command = Some(status);
        }

        recovery
    }

    /// Recover on every host
    #[allow(clippy::too_many_arguments)]
    pub fn recover_fleet(
        &self,
        runner: &FleetRunner,
        hosts: &[Host],
        invocation: &Invocation,
        files: &SystemFileSet,
        date: Option<SnapshotDate>,
        dry_run: bool,
        command: Option<&str>,
        policy: PostRecoverPolicy,
    ) -> Vec<HostReport<HostRecovery>> {
        runner.run(hosts, invocation.today, |ctx| {
            self.recover_host(ctx, files, date, dry_run, command, policy)
        })
    }
}
