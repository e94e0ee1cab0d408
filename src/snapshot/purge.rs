//! Purge manager for flashback
//!
//! Deletes the whole archive tree on a host. Confirmation is the caller's
//! job; by the time `purge` runs the operator has agreed.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::{HostContext, Invocation};
use crate::error::Failure;
use crate::executor::Operation;
use crate::fleet::{FleetRunner, HostReport};
use crate::models::Host;

/// What happened to a host's archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PurgeStatus {
    /// Archive removed, or there was nothing to remove
    Purged,
    Failed(Failure),
}

/// Removes archive trees
pub struct PurgeManager {
    archive_dir: PathBuf,
}

impl PurgeManager {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Recursively delete the archive directory on the context's host
    pub fn purge(&self, ctx: &HostContext<'_>) -> PurgeStatus {
        match ctx.execute(&Operation::RemoveTree {
            path: self.archive_dir.clone(),
        }) {
            Ok(_) => {
                tracing::info!(host = %ctx.host, dir = %self.archive_dir.display(), "purged");
                PurgeStatus::Purged
            }
            Err(e) => {
                tracing::warn!(host = %ctx.host, "purge failed: {}", e);
                PurgeStatus::Failed(e.into())
            }
        }
    }

    pub fn purge_fleet(
        &self,
        runner: &FleetRunner,
        hosts: &[Host],
        invocation: &Invocation,
    ) -> Vec<HostReport<PurgeStatus>> {
        runner.run(hosts, invocation.today, |ctx| self.purge(ctx))
    }
}
