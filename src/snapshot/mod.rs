//! Snapshot lifecycle for flashback
//!
//! Snapshots are plain copies of system files stored per host under
//! `<archive>/<YYYYMMDD>/<basename>`.
//!
//! # Architecture
//!
//! - `resolve`: maps a date selector to a live or archived location
//! - `ArchiveManager`: copies live files into today's snapshot
//! - `DiffEngine`: compares two resolved locations per file
//! - `RecoverManager`: copies a snapshot back over the live file
//! - `PurgeManager`: removes a host's whole archive tree
//!
//! Every per-file failure is captured in the returned outcome. One
//! unreadable file or unreachable host never stops the others.
//!
//! # Example
//!
//! ```rust,ignore
//! use flashback::context::Invocation;
//! use flashback::snapshot::ArchiveManager;
//!
//! let invocation = Invocation::start();
//! let manager = ArchiveManager::new("/root/.flashback");
//! let reports = runner.run(&hosts, invocation.today, |ctx| manager.archive(ctx, &files));
//! ```

mod archive;
mod diff;
mod outcome;
mod purge;
mod recover;
mod resolver;
pub mod unified;

pub use archive::{ArchiveManager, ArchiveReport, ArchiveStatus};
pub use diff::{DiffEngine, DiffReport, DiffStatus};
pub use outcome::{Outcome, Tone};
pub use purge::{PurgeManager, PurgeStatus};
pub use recover::{
    CommandStatus, HostRecovery, PostRecoverPolicy, RecoverManager, RecoverReport, RecoverStatus,
};
pub use resolver::resolve;
