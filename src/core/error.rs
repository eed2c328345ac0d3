//! Error types and result handling for Filewarden.
//!
//! Operational failures are kept strictly separate from scan verdicts: a
//! file that cannot be read yields an `Error`, never a `Verdict`, so callers
//! cannot mistake an I/O problem for a policy decision.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Filewarden operations.
#[derive(Error, Debug)]
pub enum Error {
    // ===== I/O Errors =====
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Failed to access directory: {path}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== Quarantine Errors =====
    #[error("Failed to quarantine file: {path} - {reason}")]
    QuarantineFailed { path: PathBuf, reason: String },

    // ===== Configuration Errors =====
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    #[error("Invalid configuration value: {field} - {message}")]
    ConfigInvalid { field: String, message: String },

    // ===== Detection Errors =====
    #[error("Failed to load denylist: {0}")]
    DenylistLoad(String),

    #[error("Failed to load classifier model: {0}")]
    ModelLoad(String),

    #[error("Classifier inference failed: {0}")]
    ModelInference(String),

    // ===== Process Errors =====
    #[error("Failed to enumerate processes: {0}")]
    ProcessEnumeration(String),

    // ===== Action Log Errors =====
    #[error("Failed to append to action log: {path}")]
    ActionLogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== Serialization Errors =====
    #[error("JSON serialization error")]
    JsonSerialize(#[from] serde_json::Error),

    // ===== Generic Errors =====
    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl Error {
    /// Create a file read error, mapping missing paths to `PathNotFound`.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::PathNotFound(path)
        } else {
            Self::FileRead { path, source }
        }
    }

    /// Create a quarantine error.
    pub fn quarantine(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::QuarantineFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable (a batch scan can continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. } | Error::PathNotFound(_) | Error::QuarantineFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PathNotFound(PathBuf::from("/test/path"));
        assert_eq!(err.to_string(), "Path not found: /test/path");
    }

    #[test]
    fn test_file_read_maps_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::file_read("/missing", io);
        assert!(matches!(err, Error::PathNotFound(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::file_read("/locked", io);
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_recoverable_errors() {
        let err = Error::PathNotFound(PathBuf::from("/x"));
        assert!(err.is_recoverable());

        let err = Error::ProcessEnumeration("no /proc".to_string());
        assert!(!err.is_recoverable());
    }
}
