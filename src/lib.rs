//! flashback - roll back small system files in a flash
//!
//! This library archives small, critical system files (`/etc/passwd`,
//! `/etc/shadow`, ...) into dated snapshots on each managed host, and can
//! diff, restore, report on and purge those snapshots across a fleet.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings and controller-side paths
//! - `error`: Custom error types
//! - `models`: Hosts, system files, snapshot dates and resolved locations
//! - `context`: Per-invocation and per-host execution context
//! - `executor`: How operations reach a host (local filesystem or ssh)
//! - `fleet`: Bounded parallel fan-out across hosts
//! - `snapshot`: Archive, diff, recover and purge engines
//! - `report`: Archive index and its rendering
//! - `journal`: Append-only record of every outcome
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flashback::context::Invocation;
//! use flashback::executor::LocalExecutor;
//! use flashback::fleet::FleetRunner;
//! use flashback::snapshot::ArchiveManager;
//!
//! let runner = FleetRunner::new(Arc::new(LocalExecutor::new()), 4);
//! let manager = ArchiveManager::new("/root/.flashback");
//! let reports = manager.archive_fleet(&runner, &hosts, &Invocation::start(), &files);
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod executor;
pub mod fleet;
pub mod journal;
pub mod logging;
pub mod models;
pub mod report;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use error::{FlashbackError, FlashbackResult};
