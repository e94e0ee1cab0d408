//! Archive index built from raw host listings

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::context::{HostContext, Invocation};
use crate::error::{Failure, FlashbackError, FlashbackResult};
use crate::executor::{OpOutput, Operation};
use crate::fleet::{FleetRunner, HostReport};
use crate::models::date::is_snapshot_date;
use crate::models::{Host, SnapshotDate};

/// Snapshots held by one host, by date; file names keep listing order
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct HostArchives {
    pub host: String,
    pub dates: BTreeMap<SnapshotDate, Vec<String>>,
}

impl HostArchives {
    fn add(&mut self, date: SnapshotDate, file: &str) {
        let files = self.dates.entry(date).or_default();
        if !files.iter().any(|f| f == file) {
            files.push(file.to_string());
        }
    }
}

/// host → date → files, hosts in the order they were listed
///
/// Serializes as a map keyed by host name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    hosts: Vec<HostArchives>,
}

impl ArchiveIndex {
    pub fn hosts(&self) -> &[HostArchives] {
        &self.hosts
    }

    pub fn get(&self, host: &str) -> Option<&HostArchives> {
        self.hosts.iter().find(|h| h.host == host)
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    fn entry(&mut self, host: &str) -> &mut HostArchives {
        let pos = match self.hosts.iter().position(|h| h.host == host) {
            Some(pos) => pos,
            None => {
                self.hosts.push(HostArchives {
                    host: host.to_string(),
                    dates: BTreeMap::new(),
                });
                self.hosts.len() - 1
            }
        };
        &mut self.hosts[pos]
    }
}

impl Serialize for ArchiveIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.hosts.len()))?;
        for entry in &self.hosts {
            map.serialize_entry(&entry.host, &entry.dates)?;
        }
        map.end()
    }
}

/// Split an archived path into its snapshot date and file name
///
/// Only `.../<YYYYMMDD>/<name>` qualifies.
fn parse_archived_path(path: &str) -> Option<(SnapshotDate, &str)> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 3 {
        return None;
    }
    let name = segments[segments.len() - 1];
    let date = segments[segments.len() - 2];
    if name.is_empty() || !is_snapshot_date(date) {
        return None;
    }
    SnapshotDate::parse(date).ok().map(|d| (d, name))
}

/// Build the index from `(host, listing)` pairs
///
/// A listing is whitespace separated paths. Paths that are not of the
/// form `.../<YYYYMMDD>/<name>` are dropped. Every host appears in the
/// result, even when nothing in its listing matched.
pub fn build_index<'a, I>(listings: I) -> ArchiveIndex
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut index = ArchiveIndex::default();
    for (host, listing) in listings {
        let entry = index.entry(host);
        for path in listing.split_whitespace() {
            match parse_archived_path(path) {
                Some((date, name)) => entry.add(date, name),
                None => tracing::trace!(host, path, "ignoring listing entry"),
            }
        }
    }
    index
}

/// Fetches archive listings from hosts
pub struct ReportCollector {
    archive_dir: PathBuf,
}

impl ReportCollector {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    /// Raw listing of the archive directory on the context's host
    pub fn list_archives(&self, ctx: &HostContext<'_>) -> FlashbackResult<String> {
        match ctx.execute(&Operation::ListFiles {
            root: self.archive_dir.clone(),
        })? {
            OpOutput::Listing(listing) => Ok(listing),
            other => Err(FlashbackError::Io(format!(
                "unexpected executor output for listing: {:?}",
                other
            ))),
        }
    }

    /// List every host; a failed listing is logged and leaves that host empty
    ///
    /// Returns the index together with the per-host listing failures.
    pub fn collect(
        &self,
        runner: &FleetRunner,
        hosts: &[Host],
        invocation: &Invocation,
    ) -> (ArchiveIndex, Vec<HostReport<Failure>>) {
        let listings = runner.run(hosts, invocation.today, |ctx| self.list_archives(ctx));

        let mut failures = Vec::new();
        let mut raw = Vec::with_capacity(listings.len());
        for report in listings {
            match report.outcome {
                Ok(listing) => raw.push((report.host, listing)),
                Err(e) => {
                    tracing::warn!(host = %report.host, "cannot list archives: {}", e);
                    failures.push(HostReport {
                        host: report.host.clone(),
                        outcome: Failure::from(e),
                    });
                    raw.push((report.host, String::new()));
                }
            }
        }

        let index = build_index(raw.iter().map(|(h, l)| (h.as_str(), l.as_str())));
        (index, failures)
    }
}
