//! Append-only journal file
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{FlashbackError, FlashbackResult};

use super::entry::JournalEntry;

/// Writes journal entries to a JSONL file
pub struct Journal {
    log_path: PathBuf,
    enabled: bool,
}

impl Journal {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            enabled: true,
        }
    }

    /// A journal that drops every entry
    pub fn disabled(log_path: PathBuf) -> Self {
        Self {
            log_path,
            enabled: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append entries and flush once at the end
    pub fn record(&self, entries: &[JournalEntry]) -> FlashbackResult<()> {
        if !self.enabled || entries.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FlashbackError::Io(format!("Failed to create journal directory: {}", e))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| FlashbackError::Io(format!("Failed to open journal: {}", e)))?;

        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                FlashbackError::Json(format!("Failed to serialize journal entry: {}", e))
            })?;
            writeln!(file, "{}", json)
                .map_err(|e| FlashbackError::Io(format!("Failed to write journal entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| FlashbackError::Io(format!("Failed to flush journal: {}", e)))?;

        Ok(())
    }

    /// Append entries; a write failure is logged and otherwise ignored
    pub fn record_or_warn(&self, entries: &[JournalEntry]) {
        if let Err(e) = self.record(entries) {
            tracing::warn!(path = %self.log_path.display(), "journal not written: {}", e);
        }
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> FlashbackResult<Vec<JournalEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| FlashbackError::Io(format!("Failed to open journal: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                FlashbackError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line).map_err(|e| {
                FlashbackError::Json(format!(
                    "Failed to parse journal entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> FlashbackResult<Vec<JournalEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}
