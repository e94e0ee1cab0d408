//! `flashback purge`

use std::io::{self, BufRead, Write};

use clap::Args;

use super::session::{CommonArgs, Session};
use super::Completion;
use crate::config::paths::FlashbackPaths;
use crate::config::settings::Settings;
use crate::display::{format_purge, Palette, Tally};
use crate::error::{FlashbackError, FlashbackResult};
use crate::journal::{JournalAction, JournalEntry};
use crate::snapshot::PurgeManager;

/// Arguments for `flashback purge`
#[derive(Args, Debug)]
pub struct PurgeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Delete the whole archive directory on every host
pub fn handle_purge_command(
    paths: &FlashbackPaths,
    settings: &Settings,
    args: PurgeArgs,
) -> FlashbackResult<Completion> {
    let session = Session::open(&args.common, paths, settings)?;
    let manager = PurgeManager::new(&session.archive_dir);

    if !args.yes {
        let stdin = io::stdin();
        let confirmed = confirm(&mut stdin.lock(), &session.archive_dir.display().to_string())?;
        if !confirmed {
            println!(
                "Directory {} was not removed.",
                session.archive_dir.display()
            );
            return Ok(Completion::Declined);
        }
    }

    let reports = manager.purge_fleet(&session.runner, &session.hosts, &session.invocation);

    let palette = Palette::from_env();
    print!("{}", format_purge(&reports, &palette));

    let run_id = session.invocation.run_id;
    let mut tally = Tally::default();
    let entries: Vec<_> = reports
        .iter()
        .map(|report| {
            tally.add(&report.outcome);
            JournalEntry::new(run_id, JournalAction::Purge, &report.host, None, &report.outcome)
                .with_detail(manager.archive_dir().display().to_string())
        })
        .collect();
    session.record(&entries);

    println!("{}", tally);
    Ok(Completion::from_tally(&tally))
}

/// Ask the operator to type `yes`
fn confirm(input: &mut impl BufRead, archive_dir: &str) -> FlashbackResult<bool> {
    print!(
        "Are you absolutely sure you wish to purge this directory: {}? (yes/no): ",
        archive_dir
    );
    io::stdout()
        .flush()
        .map_err(|e| FlashbackError::Io(format!("Failed to write prompt: {}", e)))?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| FlashbackError::Io(format!("Failed to read answer: {}", e)))?;
    Ok(answer.trim() == "yes")
}
