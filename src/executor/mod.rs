//! Execution of file operations on managed hosts
//!
//! The snapshot engines never build shell strings. They describe what they
//! need as an [`Operation`] and hand it to an [`Executor`], which decides how
//! to carry it out on a given host.
//!
//! # Implementations
//!
//! - [`LocalExecutor`]: operates on this machine's filesystem, optionally
//!   giving every host its own sandbox directory
//! - [`SshExecutor`]: runs a fixed command per operation through the system
//!   `ssh` client, optionally under `sudo`

mod local;
mod ssh;

pub use local::LocalExecutor;
pub use ssh::{classify_remote_failure, quote, SshExecutor};

use std::path::PathBuf;

use crate::error::FlashbackResult;
use crate::models::Host;

/// The closed set of things the core asks a host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a directory and its parents; succeeds if it already exists
    EnsureDir { path: PathBuf },
    /// Copy `source` to `destination` unless the destination is at least as
    /// new as the source. Mode and timestamps are preserved.
    CopyIfNewer {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Overwrite `destination` with `source`, preserving mode, timestamps and
    /// ownership where permitted
    CopyOver {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Read a whole file
    ReadFile { path: PathBuf },
    /// List every regular file below `root`; empty when `root` is missing
    ListFiles { root: PathBuf },
    /// Recursively delete `path`; succeeds if it does not exist
    RemoveTree { path: PathBuf },
    /// Run an operator-supplied shell command
    RunCommand { command: String },
}

impl Operation {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::EnsureDir { .. } => "ensure-dir",
            Operation::CopyIfNewer { .. } => "copy-if-newer",
            Operation::CopyOver { .. } => "copy-over",
            Operation::ReadFile { .. } => "read-file",
            Operation::ListFiles { .. } => "list-files",
            Operation::RemoveTree { .. } => "remove-tree",
            Operation::RunCommand { .. } => "run-command",
        }
    }
}

/// Structured result of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutput {
    /// The operation completed and has nothing to report
    Done,
    /// `CopyIfNewer` copied the file
    Copied,
    /// `CopyIfNewer` left an up-to-date destination alone
    Skipped,
    /// Bytes returned by `ReadFile`
    Contents(Vec<u8>),
    /// Newline-separated paths returned by `ListFiles`
    Listing(String),
}

/// Carries out operations on hosts
///
/// Implementations must be usable from several worker threads at once; each
/// call touches exactly one host.
pub trait Executor: Send + Sync {
    /// Perform `op` on `host`
    fn execute(&self, host: &Host, op: &Operation) -> FlashbackResult<OpOutput>;

    /// Human-readable transport name
    fn describe(&self) -> String;
}
