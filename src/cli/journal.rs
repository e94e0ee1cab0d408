//! `flashback journal`

use clap::Args;

use super::Completion;
use crate::config::paths::FlashbackPaths;
use crate::display::{format_journal, Palette};
use crate::error::FlashbackResult;
use crate::journal::Journal;

/// Arguments for `flashback journal`
#[derive(Args, Debug)]
pub struct JournalArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Show the most recent journal entries
pub fn handle_journal_command(
    paths: &FlashbackPaths,
    args: JournalArgs,
) -> FlashbackResult<Completion> {
    let journal = Journal::new(paths.journal_file());
    let entries = journal.read_recent(args.limit)?;
    print!("{}", format_journal(&entries, &Palette::from_env()));
    Ok(Completion::Clean)
}
