//! Archive report for flashback
//!
//! Collects the archive listing from every host, reduces it to
//! host → date → files, and renders the result for the operator.

mod index;
mod render;

pub use index::{build_index, ArchiveIndex, HostArchives, ReportCollector};
pub use render::{render_report, ReportFormat, DEFAULT_TEMPLATE};
