//! Common view over per-file and per-host results
//!
//! The terminal output and the journal both need a short label for each
//! result and whether it counts as a failure.

use crate::error::Failure;

use super::archive::ArchiveStatus;
use super::diff::DiffStatus;
use super::purge::PurgeStatus;
use super::recover::{CommandStatus, RecoverStatus};

/// How a result should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something was changed or confirmed
    Good,
    /// Nothing needed doing, or nothing was done on purpose
    Neutral,
    Bad,
}

pub trait Outcome {
    /// Lowercase label, e.g. `copied`
    fn label(&self) -> &'static str;

    fn failure(&self) -> Option<&Failure>;

    fn tone(&self) -> Tone {
        if self.failure().is_some() {
            Tone::Bad
        } else {
            Tone::Good
        }
    }

    fn is_failure(&self) -> bool {
        self.failure().is_some()
    }
}

impl Outcome for ArchiveStatus {
    fn label(&self) -> &'static str {
        match self {
            ArchiveStatus::Copied => "copied",
            ArchiveStatus::Skipped => "skipped",
            ArchiveStatus::Failed(_) => "failed",
        }
    }

    fn failure(&self) -> Option<&Failure> {
        match self {
            ArchiveStatus::Failed(f) => Some(f),
            _ => None,
        }
    }

    fn tone(&self) -> Tone {
        match self {
            ArchiveStatus::Copied => Tone::Good,
            ArchiveStatus::Skipped => Tone::Neutral,
            ArchiveStatus::Failed(_) => Tone::Bad,
        }
    }
}

impl Outcome for DiffStatus {
    fn label(&self) -> &'static str {
        match self {
            DiffStatus::NoDifference { .. } => "identical",
            DiffStatus::DiffText { .. } => "changed",
            DiffStatus::Failed(_) => "failed",
        }
    }

    fn failure(&self) -> Option<&Failure> {
        match self {
            DiffStatus::Failed(f) => Some(f),
            _ => None,
        }
    }

    fn tone(&self) -> Tone {
        match self {
            DiffStatus::NoDifference { .. } => Tone::Good,
            DiffStatus::DiffText { .. } => Tone::Neutral,
            DiffStatus::Failed(_) => Tone::Bad,
        }
    }
}

impl Outcome for RecoverStatus {
    fn label(&self) -> &'static str {
        match self {
            RecoverStatus::Restored => "restored",
            RecoverStatus::Simulated => "simulated",
            RecoverStatus::Failed(_) => "failed",
        }
    }

    fn failure(&self) -> Option<&Failure> {
        match self {
            RecoverStatus::Failed(f) => Some(f),
            _ => None,
        }
    }

    fn tone(&self) -> Tone {
        match self {
            RecoverStatus::Restored => Tone::Good,
            RecoverStatus::Simulated => Tone::Neutral,
            RecoverStatus::Failed(_) => Tone::Bad,
        }
    }
}

impl Outcome for CommandStatus {
    fn label(&self) -> &'static str {
        match self {
            CommandStatus::Executed => "executed",
            CommandStatus::Simulated => "simulated",
            CommandStatus::Skipped => "skipped",
            CommandStatus::Failed(_) => "failed",
        }
    }

    fn failure(&self) -> Option<&Failure> {
        match self {
            CommandStatus::Failed(f) => Some(f),
            _ => None,
        }
    }

    fn tone(&self) -> Tone {
        match self {
            CommandStatus::Executed => Tone::Good,
            CommandStatus::Simulated | CommandStatus::Skipped => Tone::Neutral,
            CommandStatus::Failed(_) => Tone::Bad,
        }
    }
}

impl Outcome for PurgeStatus {
    fn label(&self) -> &'static str {
        match self {
            PurgeStatus::Purged => "purged",
            PurgeStatus::Failed(_) => "failed",
        }
    }

    fn failure(&self) -> Option<&Failure> {
        match self {
            PurgeStatus::Failed(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_failures_are_bad() {
        let failure = Failure {
            kind: FailureKind::Transport,
            message: "unreachable".into(),
        };
        let status = PurgeStatus::Failed(failure.clone());
        assert!(status.is_failure());
        assert_eq!(status.tone(), Tone::Bad);
        assert_eq!(status.failure(), Some(&failure));
    }

    #[test]
    fn test_labels_and_tones() {
        assert_eq!(ArchiveStatus::Skipped.label(), "skipped");
        assert_eq!(ArchiveStatus::Skipped.tone(), Tone::Neutral);
        assert_eq!(PurgeStatus::Purged.tone(), Tone::Good);
        assert_eq!(CommandStatus::Skipped.tone(), Tone::Neutral);
        assert!(!RecoverStatus::Simulated.is_failure());
        assert_eq!(
            DiffStatus::DiffText { text: String::new() }.label(),
            "changed"
        );
    }
}
