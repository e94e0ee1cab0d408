//! Journal entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Host, RunId};
use crate::snapshot::Outcome;

/// Which command produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JournalAction {
    Archive,
    Diff,
    Recover,
    PostRecover,
    Purge,
}

impl std::fmt::Display for JournalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalAction::Archive => write!(f, "archive"),
            JournalAction::Diff => write!(f, "diff"),
            JournalAction::Recover => write!(f, "recover"),
            JournalAction::PostRecover => write!(f, "post-recover"),
            JournalAction::Purge => write!(f, "purge"),
        }
    }
}

/// A single journal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// When the outcome was recorded (UTC)
    pub timestamp: DateTime<Utc>,

    /// Invocation the entry belongs to
    pub run_id: RunId,

    pub action: JournalAction,

    pub host: String,

    /// System file basename, absent for host-level outcomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Outcome label, e.g. `copied` or `failed`
    pub outcome: String,

    /// Failure message or other context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JournalEntry {
    /// Record `outcome` for `host`, stamped now
    pub fn new(
        run_id: RunId,
        action: JournalAction,
        host: &Host,
        file: Option<&str>,
        outcome: &dyn Outcome,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id,
            action,
            host: host.to_string(),
            file: file.map(str::to_string),
            outcome: outcome.label().to_string(),
            detail: outcome.failure().map(|f| f.to_string()),
        }
    }

    /// Attach context to an entry that has none
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        if self.detail.is_none() {
            self.detail = Some(detail.into());
        }
        self
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == "failed"
    }

    /// One-line summary for terminal display
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.run_id,
            self.action,
            self.host
        );
        if let Some(file) = &self.file {
            line.push(' ');
            line.push_str(file);
        }
        line.push_str(": ");
        line.push_str(&self.outcome);
        if let Some(detail) = &self.detail {
            line.push_str(&format!(" ({})", detail));
        }
        line
    }
}
