//! Configuration module for flashback
//!
//! This module provides configuration management including:
//! - Config directory resolution
//! - Persisted operator settings (defaults for every subcommand)

pub mod paths;
pub mod settings;

pub use paths::FlashbackPaths;
pub use settings::Settings;
