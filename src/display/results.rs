//! Per-host result formatting
//!
//! Every command prints one section per host, one line per file, and a
//! closing tally such as `3 copied, 1 skipped, 1 failed`.

use std::fmt;

use super::style::{left_align, truncate, Palette};
use crate::fleet::HostReport;
use crate::journal::JournalEntry;
use crate::snapshot::{
    ArchiveReport, DiffReport, DiffStatus, HostRecovery, Outcome, PurgeStatus, Tone,
};

/// Longest failure message shown inline
const DETAIL_WIDTH: usize = 120;

/// Count of outcomes by label, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(&'static str, usize)>,
    failures: usize,
}

impl Tally {
    pub fn add(&mut self, outcome: &dyn Outcome) {
        let label = outcome.label();
        match self.counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((label, 1)),
        }
        if outcome.is_failure() {
            self.failures += 1;
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "nothing to do");
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(label, n)| format!("{} {}", n, label))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

fn status_line(palette: &Palette, name: &str, width: usize, outcome: &dyn Outcome) -> String {
    let mut line = format!(
        "  {}  {}",
        left_align(name, width),
        palette.tone(outcome.label(), outcome.tone())
    );
    if let Some(failure) = outcome.failure() {
        line.push_str(&format!(" ({})", truncate(&failure.message, DETAIL_WIDTH)));
    }
    line
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or(4).max(4)
}

/// Format archive results
pub fn format_archive(reports: &[HostReport<Vec<ArchiveReport>>], palette: &Palette) -> String {
    let mut output = String::new();
    for report in reports {
        output.push_str(&palette.bold(report.host.as_str()));
        output.push('\n');
        let width = name_width(report.outcome.iter().map(|r| r.file.as_str()));
        for file in &report.outcome {
            output.push_str(&status_line(palette, &file.file, width, &file.status));
            output.push('\n');
        }
    }
    output
}

/// Format diff results, including the diff text of changed files
pub fn format_diff(reports: &[HostReport<Vec<DiffReport>>], palette: &Palette) -> String {
    let mut output = String::new();
    for report in reports {
        output.push_str(&palette.bold(report.host.as_str()));
        output.push('\n');
        let width = name_width(report.outcome.iter().map(|r| r.file.as_str()));
        for file in &report.outcome {
            let mut line = status_line(palette, &file.file, width, &file.status);
            match &file.status {
                DiffStatus::NoDifference { first, second } => {
                    line.push_str(&format!(" ({} = {})", first, second));
                    output.push_str(&line);
                    output.push('\n');
                }
                DiffStatus::DiffText { text } => {
                    line.push_str(&format!(" ({} → {})", file.first.label(), file.second.label()));
                    output.push_str(&line);
                    output.push('\n');
                    for diff_line in text.lines() {
                        output.push_str(&palette.diff_line(diff_line));
                        output.push('\n');
                    }
                }
                DiffStatus::Failed(_) => {
                    output.push_str(&line);
                    output.push('\n');
                }
            }
        }
    }
    output
}

/// Format recover results and the post-recover command status
pub fn format_recover(reports: &[HostReport<HostRecovery>], palette: &Palette) -> String {
    let mut output = String::new();
    for report in reports {
        output.push_str(&palette.bold(report.host.as_str()));
        output.push('\n');
        let files = &report.outcome.files;
        let width = name_width(files.iter().map(|r| r.file.as_str()).chain(["command"]));
        for file in files {
            let mut line = status_line(palette, &file.file, width, &file.status);
            line.push_str(&format!(" [{}]", file.date));
            output.push_str(&line);
            output.push('\n');
        }
        if let Some(command) = &report.outcome.command {
            output.push_str(&status_line(palette, "command", width, command));
            output.push('\n');
        }
    }
    output
}

/// Format purge results
pub fn format_purge(reports: &[HostReport<PurgeStatus>], palette: &Palette) -> String {
    let width = name_width(reports.iter().map(|r| r.host.as_str()));
    let mut output = String::new();
    for report in reports {
        output.push_str(status_line(palette, report.host.as_str(), width, &report.outcome).trim_start());
        output.push('\n');
    }
    output
}

/// Format journal entries, oldest first
pub fn format_journal(entries: &[JournalEntry], palette: &Palette) -> String {
    if entries.is_empty() {
        return "Journal is empty.\n".to_string();
    }
    let mut output = String::new();
    for entry in entries {
        let line = entry.summary();
        if entry.is_failure() {
            output.push_str(&palette.tone(&line, Tone::Bad));
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }
    output
}
