//! Fan-out of per-host operations across the fleet
//!
//! The snapshot engines work on one host at a time. `FleetRunner` calls them
//! for every host, either serially or on a bounded rayon pool, and returns
//! the results in the order the hosts were given.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::context::HostContext;
use crate::executor::Executor;
use crate::models::{Host, SnapshotDate};

/// Result of one operation on one host
#[derive(Debug, Clone, Serialize)]
pub struct HostReport<T> {
    pub host: Host,
    pub outcome: T,
}

/// Runs a per-host operation over a set of hosts
#[derive(Clone)]
pub struct FleetRunner {
    executor: Arc<dyn Executor>,
    workers: usize,
}

impl FleetRunner {
    /// `workers` of 0 or 1 runs hosts one after another
    pub fn new(executor: Arc<dyn Executor>, workers: usize) -> Self {
        Self {
            executor,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    /// Call `op` once per host with a context sharing the same `today`
    pub fn run<T, F>(&self, hosts: &[Host], today: SnapshotDate, op: F) -> Vec<HostReport<T>>
    where
        T: Send,
        F: Fn(&HostContext<'_>) -> T + Sync,
    {
        let executor = self.executor.as_ref();
        let run_one = |host: &Host| {
            let ctx = HostContext::new(host, executor, today);
            let _span = tracing::debug_span!("host", host = %host).entered();
            HostReport {
                host: host.clone(),
                outcome: op(&ctx),
            }
        };

        if self.workers <= 1 || hosts.len() <= 1 {
            return hosts.iter().map(run_one).collect();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.min(hosts.len()))
            .thread_name(|i| format!("flashback-worker-{}", i))
            .build()
        {
            Ok(pool) => pool.install(|| hosts.par_iter().map(run_one).collect()),
            Err(e) => {
                tracing::warn!("worker pool unavailable, running serially: {}", e);
                hosts.iter().map(run_one).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlashbackResult;
    use crate::executor::{OpOutput, Operation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; answers every operation with `Done`
    struct CountingExecutor {
        calls: AtomicUsize,
    }

    impl Executor for CountingExecutor {
        fn execute(&self, _host: &Host, _op: &Operation) -> FlashbackResult<OpOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OpOutput::Done)
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    fn hosts(n: usize) -> Vec<Host> {
        (0..n).map(|i| Host::new(format!("host{:02}", i)).unwrap()).collect()
    }

    fn today() -> SnapshotDate {
        SnapshotDate::parse("20260101").unwrap()
    }

    #[test]
    fn test_parallel_preserves_host_order() {
        let exec = Arc::new(CountingExecutor {
            calls: AtomicUsize::new(0),
        });
        let runner = FleetRunner::new(exec.clone(), 4);
        let hosts = hosts(16);

        let reports = runner.run(&hosts, today(), |ctx| {
            ctx.execute(&Operation::RunCommand { command: "true".into() })
                .unwrap();
            ctx.host.to_string()
        });

        let order: Vec<_> = reports.iter().map(|r| r.outcome.clone()).collect();
        let expected: Vec<_> = hosts.iter().map(|h| h.to_string()).collect();
        assert_eq!(order, expected);
        assert_eq!(exec.calls.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn test_every_host_sees_the_same_today() {
        let exec = Arc::new(CountingExecutor {
            calls: AtomicUsize::new(0),
        });
        let runner = FleetRunner::new(exec, 3);

        let reports = runner.run(&hosts(5), today(), |ctx| ctx.today);
        assert!(reports.iter().all(|r| r.outcome == today()));
    }

    #[test]
    fn test_zero_workers_means_serial() {
        let exec = Arc::new(CountingExecutor {
            calls: AtomicUsize::new(0),
        });
        let runner = FleetRunner::new(exec, 0);
        assert_eq!(runner.workers(), 1);
        assert_eq!(runner.run(&hosts(3), today(), |_| ()).len(), 3);
    }
}
