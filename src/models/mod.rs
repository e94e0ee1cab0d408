//! Core data models for flashback
//!
//! This module contains the data structures shared by every snapshot
//! operation: hosts, the system files being tracked, snapshot dates and
//! the locations a date selector resolves to.

pub mod date;
pub mod host;
pub mod ids;
pub mod location;
pub mod system_file;

pub use date::{DateToken, SnapshotDate};
pub use host::Host;
pub use ids::RunId;
pub use location::ResolvedLocation;
pub use system_file::{SystemFile, SystemFileSet};
