//! `flashback recover`

use clap::Args;

use super::session::{CommonArgs, Session};
use super::Completion;
use crate::config::paths::FlashbackPaths;
use crate::config::settings::Settings;
use crate::display::{format_recover, Palette, Tally};
use crate::error::FlashbackResult;
use crate::journal::{JournalAction, JournalEntry};
use crate::models::date::parse_recover_date;
use crate::snapshot::{PostRecoverPolicy, RecoverManager};

/// Arguments for `flashback recover`
#[derive(Args, Debug)]
pub struct RecoverArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Snapshot to restore from; 0 means today
    #[arg(short = 'r', long = "recover-date", value_name = "YYYYMMDD", default_value = "0")]
    pub recover_date: String,

    /// Command to run on each host after the files are restored,
    /// e.g. "systemctl restart nscd"
    #[arg(short = 'c', long = "post-recover-command", value_name = "COMMAND")]
    pub post_recover_command: Option<String>,

    /// Report what would be restored without touching any host
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// When the post-recover command runs
    #[arg(long, value_enum, value_name = "POLICY")]
    pub post_recover_policy: Option<PostRecoverPolicy>,
}

/// Restore each system file from a snapshot on every host
pub fn handle_recover_command(
    paths: &FlashbackPaths,
    settings: &Settings,
    args: RecoverArgs,
) -> FlashbackResult<Completion> {
    let date = parse_recover_date(&args.recover_date)?;
    let policy = args
        .post_recover_policy
        .unwrap_or(settings.post_recover_policy);
    let session = Session::open(&args.common, paths, settings)?;
    let manager = RecoverManager::new(&session.archive_dir);

    if args.dry_run {
        println!("File recovery (dry run, nothing will be changed)");
    }
    let reports = manager.recover_fleet(
        &session.runner,
        &session.hosts,
        &session.invocation,
        &session.files,
        date,
        args.dry_run,
        args.post_recover_command.as_deref(),
        policy,
    );

    let palette = Palette::from_env();
    print!("{}", format_recover(&reports, &palette));

    let run_id = session.invocation.run_id;
    let mut entries = Vec::new();
    let mut tally = Tally::default();
    for report in &reports {
        for file in &report.outcome.files {
            tally.add(&file.status);
            entries.push(
                JournalEntry::new(
                    run_id,
                    JournalAction::Recover,
                    &report.host,
                    Some(&file.file),
                    &file.status,
                )
                .with_detail(format!("from {}", file.date)),
            );
        }
        if let (Some(status), Some(command)) =
            (&report.outcome.command, &args.post_recover_command)
        {
            tally.add(status);
            entries.push(
                JournalEntry::new(run_id, JournalAction::PostRecover, &report.host, None, status)
                    .with_detail(command.clone()),
            );
        }
    }
    session.record(&entries);

    println!("{}", tally);
    Ok(Completion::from_tally(&tally))
}
