//! Display formatting for terminal output
//!
//! Turns per-host outcomes into colored, aligned text for stdout.

pub mod results;
pub mod style;

pub use results::{
    format_archive, format_diff, format_journal, format_purge, format_recover, Tally,
};
pub use style::Palette;
