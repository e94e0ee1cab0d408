//! `flashback report`

use std::path::PathBuf;

use clap::Args;

use super::session::{CommonArgs, Session};
use super::Completion;
use crate::config::paths::FlashbackPaths;
use crate::config::settings::Settings;
use crate::error::{FlashbackError, FlashbackResult};
use crate::report::{render_report, ReportCollector, ReportFormat};

/// Arguments for `flashback report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// tera template for the text format
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
}

/// Summarize which snapshots exist on every host
pub fn handle_report_command(
    paths: &FlashbackPaths,
    settings: &Settings,
    args: ReportArgs,
) -> FlashbackResult<Completion> {
    let template = match args.template.as_ref().or(settings.report_template.as_ref()) {
        Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
            FlashbackError::Template(format!("Failed to read {}: {}", path.display(), e))
        })?),
        None => None,
    };

    let session = Session::open(&args.common, paths, settings)?;
    let collector = ReportCollector::new(&session.archive_dir);
    let (index, failures) = collector.collect(&session.runner, &session.hosts, &session.invocation);

    print!("{}", render_report(&index, args.format, template.as_deref())?);

    for failure in &failures {
        eprintln!(
            "warning: could not list archives on {}: {}",
            failure.host, failure.outcome
        );
    }

    Ok(if failures.is_empty() {
        Completion::Clean
    } else {
        Completion::Failures
    })
}
