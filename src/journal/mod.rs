//! Run journal for flashback
//!
//! Every archive, diff, recover and purge outcome is appended to a local
//! journal so an operator can later see what was done to which host.
//!
//! # Architecture
//!
//! - `JournalEntry`: one outcome for one host (and file, when relevant)
//! - `Journal`: appends entries to `journal.log` as JSON lines and reads
//!   them back
//!
//! # Example
//!
//! ```rust,ignore
//! use flashback::journal::{Journal, JournalAction, JournalEntry};
//!
//! let journal = Journal::new(paths.journal_file());
//! let entry = JournalEntry::new(run_id, JournalAction::Archive, &host, Some("passwd"), &status);
//! journal.record_or_warn(&[entry]);
//! ```

mod entry;
mod logger;

pub use entry::{JournalAction, JournalEntry};
pub use logger::Journal;
