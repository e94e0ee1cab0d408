//! Custom error types for flashback
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for flashback operations
#[derive(Error, Debug, Clone)]
pub enum FlashbackError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid operator input (date tokens, host names, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A file or directory that an operation needs is absent
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A privileged operation was refused
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The host could not be reached or authenticated against
    #[error("Transport error on {host}: {message}")]
    Transport { host: String, message: String },

    /// A remote command ran but exited unsuccessfully
    #[error("Remote command failed on {host}: {message}")]
    Remote { host: String, message: String },

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Report template errors
    #[error("Template error: {0}")]
    Template(String),
}

impl FlashbackError {
    /// Create a "not found" error for a path
    pub fn path_not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            entity_type: "Path",
            identifier: path.as_ref().display().to_string(),
        }
    }

    /// Classify an I/O error that happened while touching `path`
    pub fn from_io_at(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::path_not_found(path),
            std::io::ErrorKind::PermissionDenied => {
                Self::PermissionDenied(format!("{}: {}", path.display(), err))
            }
            _ => Self::Io(format!("{}: {}", path.display(), err)),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The failure category reported in per-host outcomes
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } => FailureKind::Transport,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::PermissionDenied(_) => FailureKind::PermissionDenied,
            Self::Remote { .. } => FailureKind::Remote,
            _ => FailureKind::Other,
        }
    }
}

impl From<std::io::Error> for FlashbackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FlashbackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for FlashbackError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<tera::Error> for FlashbackError {
    fn from(err: tera::Error) -> Self {
        use std::error::Error as _;

        // tera keeps the useful detail in the source chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Template(message)
    }
}

/// Result type alias for flashback operations
pub type FlashbackResult<T> = Result<T, FlashbackError>;

/// Category of a per-host or per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    NotFound,
    PermissionDenied,
    Remote,
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::PermissionDenied => write!(f, "permission denied"),
            FailureKind::Remote => write!(f, "remote"),
            FailureKind::Other => write!(f, "error"),
        }
    }
}

/// A captured failure, carried inside outcomes instead of being thrown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<FlashbackError> for Failure {
    fn from(err: FlashbackError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<&FlashbackError> for Failure {
    fn from(err: &FlashbackError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
