//! Host identifiers
//!
//! A host is whatever the executor needs to reach a machine: a DNS name,
//! an address, or an ssh config alias. The core only uses it as a label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{FlashbackError, FlashbackResult};

/// A target machine in the fleet
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(String);

impl Host {
    /// Create a host identifier, rejecting empty names, embedded whitespace
    /// and a leading `-`
    pub fn new(name: impl Into<String>) -> FlashbackResult<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(FlashbackError::Validation("host name cannot be empty".into()));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(FlashbackError::Validation(format!(
                "host name cannot contain whitespace: '{}'",
                trimmed
            )));
        }
        if trimmed.starts_with('-') {
            return Err(FlashbackError::Validation(format!(
                "host name cannot start with '-': '{}'",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The host name as given by the operator
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a hosts file: one host per line, blank lines and `#` comments skipped
pub fn parse_hosts(contents: &str) -> FlashbackResult<Vec<Host>> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Host::new)
        .collect()
}

/// Read a hosts file from disk
pub fn read_hosts_file(path: &Path) -> FlashbackResult<Vec<Host>> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| FlashbackError::from_io_at(e, path))?;
    parse_hosts(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_trims() {
        let host = Host::new("  web01.example.com\n").unwrap();
        assert_eq!(host.as_str(), "web01.example.com");
    }

    #[test]
    fn test_host_rejects_empty_and_whitespace() {
        assert!(Host::new("").unwrap_err().is_validation());
        assert!(Host::new("web 01").unwrap_err().is_validation());
    }

    #[test]
    fn test_host_rejects_option_like_names() {
        let err = Host::new("-oProxyCommand=touch${IFS}/tmp/pwned").unwrap_err();
        assert!(err.is_validation());
        assert!(parse_hosts("web01\n-oProxyCommand=true\n").is_err());
        assert!(Host::new("web-01").is_ok());
    }

    #[test]
    fn test_parse_hosts() {
        let hosts = parse_hosts("web01\n\n# db tier\ndb01\n   \nweb02\n").unwrap();
        let names: Vec<_> = hosts.iter().map(Host::as_str).collect();
        assert_eq!(names, vec!["web01", "db01", "web02"]);
    }

    #[test]
    fn test_read_hosts_file_missing() {
        let err = read_hosts_file(Path::new("/nonexistent/hosts.txt")).unwrap_err();
        assert!(err.is_not_found());
    }
}
