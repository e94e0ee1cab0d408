//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the snapshot engines. Handlers print results
//! to stdout and report whether anything failed through [`Completion`].

pub mod archive;
pub mod diff;
pub mod journal;
pub mod purge;
pub mod recover;
pub mod report;
pub mod session;

pub use archive::{handle_archive_command, ArchiveArgs};
pub use diff::{handle_diff_command, DiffArgs};
pub use journal::{handle_journal_command, JournalArgs};
pub use purge::{handle_purge_command, PurgeArgs};
pub use recover::{handle_recover_command, RecoverArgs};
pub use report::{handle_report_command, ReportArgs};
pub use session::{CommonArgs, Session};

use crate::display::Tally;

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every outcome succeeded
    Clean,
    /// At least one host or file failed
    Failures,
    /// The operator declined a confirmation
    Declined,
}

impl Completion {
    pub fn from_tally(tally: &Tally) -> Self {
        if tally.has_failures() {
            Completion::Failures
        } else {
            Completion::Clean
        }
    }

    /// Process exit status
    pub fn exit_code(self) -> u8 {
        match self {
            Completion::Clean => 0,
            Completion::Failures | Completion::Declined => 1,
        }
    }
}
