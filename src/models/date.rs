//! Snapshot dates and operator date selectors
//!
//! Snapshot directories are named `YYYYMMDD`. Operators pick a snapshot (or
//! the live file) with a date token: `0`/unset, `1`/`current`, or an explicit
//! eight-digit date.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{FlashbackError, FlashbackResult};

/// Literal that selects the live file
pub const CURRENT_LABEL: &str = "current";

/// Check that a string is exactly eight ASCII digits
pub fn is_snapshot_date(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Name of one snapshot directory (`YYYYMMDD`)
///
/// Only the shape is checked. `20251399` is accepted: it simply names a
/// snapshot that cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotDate([u8; 8]);

impl SnapshotDate {
    /// Parse an eight-digit date
    pub fn parse(s: &str) -> FlashbackResult<Self> {
        let s = s.trim();
        if !is_snapshot_date(s) {
            return Err(FlashbackError::Validation(format!(
                "Invalid snapshot date '{}': expected YYYYMMDD",
                s
            )));
        }
        let mut digits = [0u8; 8];
        digits.copy_from_slice(s.as_bytes());
        Ok(Self(digits))
    }

    /// Snapshot date for a calendar day
    pub fn from_naive(date: NaiveDate) -> Self {
        let formatted = date.format("%Y%m%d").to_string();
        let mut digits = [0u8; 8];
        // chrono pads years to four digits for every year in 0..=9999
        for (slot, byte) in digits.iter_mut().zip(formatted.bytes()) {
            *slot = byte;
        }
        Self(digits)
    }

    /// Today's date on the controller's local clock
    pub fn today() -> Self {
        Self::from_naive(chrono::Local::now().date_naive())
    }

    /// The date as a `YYYYMMDD` string slice
    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII digits
        std::str::from_utf8(&self.0).unwrap_or("00000000")
    }
}

impl fmt::Display for SnapshotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotDate {
    type Err = FlashbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SnapshotDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SnapshotDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Operator-supplied selector for one side of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateToken {
    /// Unset or `0`: today's archived snapshot
    #[default]
    Default,
    /// `1` or `current`: the live file
    Current,
    /// An explicit snapshot date
    Date(SnapshotDate),
}

impl DateToken {
    /// Parse a token as typed on the command line
    pub fn parse(s: &str) -> FlashbackResult<Self> {
        let s = s.trim();
        match s {
            "" | "0" => Ok(Self::Default),
            "1" => Ok(Self::Current),
            _ if s.eq_ignore_ascii_case(CURRENT_LABEL) => Ok(Self::Current),
            _ => SnapshotDate::parse(s).map(Self::Date).map_err(|_| {
                FlashbackError::Validation(format!(
                    "Invalid date selector '{}': expected 0, 1, current or YYYYMMDD",
                    s
                ))
            }),
        }
    }
}

impl FromStr for DateToken {
    type Err = FlashbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateToken::Default => write!(f, "0"),
            DateToken::Current => write!(f, "{}", CURRENT_LABEL),
            DateToken::Date(date) => write!(f, "{}", date),
        }
    }
}

/// Parse a recover date: `0`/empty means today, otherwise `YYYYMMDD`
pub fn parse_recover_date(s: &str) -> FlashbackResult<Option<SnapshotDate>> {
    match s.trim() {
        "" | "0" => Ok(None),
        other => SnapshotDate::parse(other).map(Some),
    }
}
