//! Explicit execution context
//!
//! Everything an operation needs to know about "where" and "when" is passed
//! in: the host being worked on, the executor that reaches it, and the single
//! `today` captured when the invocation started.

use crate::error::FlashbackResult;
use crate::executor::{Executor, OpOutput, Operation};
use crate::models::{Host, RunId, SnapshotDate};

/// Values fixed once per invocation and shared by every host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// Snapshot bucket for this run, taken from the controller clock
    pub today: SnapshotDate,
    /// Groups journal entries of this run
    pub run_id: RunId,
}

impl Invocation {
    /// Capture today's date from the controller clock
    pub fn start() -> Self {
        Self::with_today(SnapshotDate::today())
    }

    /// Use a fixed date (tests, replays)
    pub fn with_today(today: SnapshotDate) -> Self {
        Self {
            today,
            run_id: RunId::new(),
        }
    }
}

/// Per-host view handed to every snapshot operation
#[derive(Clone, Copy)]
pub struct HostContext<'a> {
    pub host: &'a Host,
    pub executor: &'a dyn Executor,
    pub today: SnapshotDate,
}

impl<'a> HostContext<'a> {
    pub fn new(host: &'a Host, executor: &'a dyn Executor, today: SnapshotDate) -> Self {
        Self {
            host,
            executor,
            today,
        }
    }

    /// Run one operation on this context's host
    pub fn execute(&self, op: &Operation) -> FlashbackResult<OpOutput> {
        self.executor.execute(self.host, op)
    }
}

impl std::fmt::Debug for HostContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("host", self.host)
            .field("executor", &self.executor.describe())
            .field("today", &self.today)
            .finish()
    }
}
