//! `flashback diff`

use clap::Args;

use super::session::{CommonArgs, Session};
use super::Completion;
use crate::config::paths::FlashbackPaths;
use crate::config::settings::Settings;
use crate::display::{format_diff, Palette, Tally};
use crate::error::FlashbackResult;
use crate::journal::{JournalAction, JournalEntry};
use crate::models::DateToken;
use crate::snapshot::{DiffEngine, DiffStatus};

/// Arguments for `flashback diff`
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// First side: YYYYMMDD, or 0 for today's snapshot
    #[arg(short = 'a', long = "date-first", value_name = "YYYYMMDD", default_value = "0")]
    pub date_first: DateToken,

    /// Second side: YYYYMMDD, or 1/current for the live file
    #[arg(short = 'b', long = "date-second", value_name = "YYYYMMDD", default_value = "1")]
    pub date_second: DateToken,
}

/// Compare two versions of each system file on every host
pub fn handle_diff_command(
    paths: &FlashbackPaths,
    settings: &Settings,
    args: DiffArgs,
) -> FlashbackResult<Completion> {
    let session = Session::open(&args.common, paths, settings)?;
    let engine = DiffEngine::new(&session.archive_dir);

    let reports = engine.diff_fleet(
        &session.runner,
        &session.hosts,
        &session.invocation,
        &session.files,
        args.date_first,
        args.date_second,
    );

    let palette = Palette::from_env();
    print!("{}", format_diff(&reports, &palette));

    let run_id = session.invocation.run_id;
    let mut entries = Vec::new();
    let mut tally = Tally::default();
    for report in &reports {
        for file in &report.outcome {
            tally.add(&file.status);
            let entry = JournalEntry::new(
                run_id,
                JournalAction::Diff,
                &report.host,
                Some(&file.file),
                &file.status,
            );
            let entry = match &file.status {
                DiffStatus::Failed(_) => entry,
                _ => entry.with_detail(format!("{} vs {}", file.first.label(), file.second.label())),
            };
            entries.push(entry);
        }
    }
    session.record(&entries);

    println!("{}", tally);
    Ok(Completion::from_tally(&tally))
}
