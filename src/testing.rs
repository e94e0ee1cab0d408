//! Shared fixtures for unit tests

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::context::HostContext;
use crate::executor::LocalExecutor;
use crate::fleet::FleetRunner;
use crate::models::{Host, SnapshotDate};

pub const ARCHIVE: &str = "/var/lib/flashback";

/// A simulated fleet: each host gets its own directory under a temp root
pub struct Sandbox {
    pub temp: TempDir,
    pub executor: LocalExecutor,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let executor = LocalExecutor::sandboxed(temp.path());
        Self { temp, executor }
    }

    /// Path on this machine backing `path` on `host`
    pub fn local(&self, host: &str, path: &str) -> PathBuf {
        self.temp
            .path()
            .join(host)
            .join(path.trim_start_matches('/'))
    }

    pub fn write(&self, host: &str, path: &str, contents: &str) -> PathBuf {
        let local = self.local(host, path);
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, contents).unwrap();
        local
    }

    pub fn read(&self, host: &str, path: &str) -> String {
        fs::read_to_string(self.local(host, path)).unwrap()
    }

    pub fn exists(&self, host: &str, path: &str) -> bool {
        self.local(host, path).exists()
    }

    pub fn ctx<'a>(&'a self, host: &'a Host, today: SnapshotDate) -> HostContext<'a> {
        HostContext::new(host, &self.executor, today)
    }

    pub fn runner(&self, workers: usize) -> FleetRunner {
        FleetRunner::new(Arc::new(self.executor.clone()), workers)
    }
}

pub fn host(name: &str) -> Host {
    Host::new(name).unwrap()
}

pub fn date(s: &str) -> SnapshotDate {
    SnapshotDate::parse(s).unwrap()
}

pub fn archive_dir() -> &'static Path {
    Path::new(ARCHIVE)
}

/// Snapshot every file under the tree rooted at `dir`, keyed by relative path
pub fn tree_contents(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}
