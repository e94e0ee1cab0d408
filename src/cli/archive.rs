//! `flashback archive`

use clap::Args;

use super::session::{CommonArgs, Session};
use super::Completion;
use crate::config::paths::FlashbackPaths;
use crate::config::settings::Settings;
use crate::display::{format_archive, Palette, Tally};
use crate::error::FlashbackResult;
use crate::journal::{JournalAction, JournalEntry};
use crate::snapshot::ArchiveManager;

/// Arguments for `flashback archive`
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Copy each system file into today's snapshot on every host
pub fn handle_archive_command(
    paths: &FlashbackPaths,
    settings: &Settings,
    args: ArchiveArgs,
) -> FlashbackResult<Completion> {
    let session = Session::open(&args.common, paths, settings)?;
    let manager = ArchiveManager::new(&session.archive_dir);

    println!(
        "Archiving {} file(s) on {} host(s) into {}",
        session.files.len(),
        session.hosts.len(),
        manager.snapshot_dir(session.invocation.today).display()
    );
    let reports = manager.archive_fleet(
        &session.runner,
        &session.hosts,
        &session.invocation,
        &session.files,
    );

    let palette = Palette::from_env();
    print!("{}", format_archive(&reports, &palette));

    let run_id = session.invocation.run_id;
    let mut entries = Vec::new();
    let mut tally = Tally::default();
    for report in &reports {
        for file in &report.outcome {
            tally.add(&file.status);
            entries.push(JournalEntry::new(
                run_id,
                JournalAction::Archive,
                &report.host,
                Some(&file.file),
                &file.status,
            ));
        }
    }
    session.record(&entries);

    println!("{}", tally);
    Ok(Completion::from_tally(&tally))
}
