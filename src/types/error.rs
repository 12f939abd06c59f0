//! Error types for globcopy

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    Configuring,
    Validating,
    Enumerating,
    Copying,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CopyStage::Configuring => "configuring",
            CopyStage::Validating => "validating",
            CopyStage::Enumerating => "enumerating",
            CopyStage::Copying => "copying",
        };
        f.write_str(name)
    }
}

/// Error types for copy operations
#[derive(Debug, Error)]
pub enum CopyError {
    /// A path that must be a directory is a file
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Source directory is absent
    #[error("Directory does not exist: {path}")]
    MissingDirectory { path: PathBuf },

    /// Destination directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern or matcher fault
    #[error("Enumeration failed: {message}")]
    Enumeration { message: String },

    /// Read/write failure on one file
    #[error("Transfer failed for {path}: {source}")]
    Transfer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parallel transfer runtime failed
    #[error("Transfer runtime error: {0}")]
    Runtime(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CopyError {
    /// Stage of the copy pipeline that failed
    pub fn stage(&self) -> CopyStage {
        match self {
            CopyError::Config(_) => CopyStage::Configuring,
            CopyError::NotADirectory { .. }
            | CopyError::MissingDirectory { .. }
            | CopyError::CreateDirectory { .. } => CopyStage::Validating,
            CopyError::Enumeration { .. } => CopyStage::Enumerating,
            CopyError::Transfer { .. } | CopyError::Runtime(_) => CopyStage::Copying,
        }
    }

    /// Check if this error came from path validation
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CopyError::NotADirectory { .. } | CopyError::MissingDirectory { .. }
        )
    }

    /// Check if this error happened while copying file contents
    pub fn is_transfer_error(&self) -> bool {
        matches!(self, CopyError::Transfer { .. })
    }

    pub(crate) fn enumeration(message: impl Into<String>) -> Self {
        CopyError::Enumeration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_not_a_directory() {
        let error = CopyError::NotADirectory {
            path: PathBuf::from("/data/file.txt"),
        };
        assert!(error.to_string().contains("Not a directory"));
        assert!(error.to_string().contains("/data/file.txt"));
        assert!(error.is_validation_error());
        assert_eq!(error.stage(), CopyStage::Validating);
    }

    #[test]
    fn test_missing_directory() {
        let error = CopyError::MissingDirectory {
            path: PathBuf::from("/nowhere"),
        };
        assert!(error.to_string().contains("does not exist"));
        assert!(error.is_validation_error());
        assert!(!error.is_transfer_error());
    }

    #[test]
    fn test_enumeration_error() {
        let error = CopyError::enumeration("invalid pattern '[a'");
        assert!(error.to_string().contains("Enumeration failed"));
        assert!(error.to_string().contains("[a"));
        assert_eq!(error.stage(), CopyStage::Enumerating);
    }

    #[test]
    fn test_transfer_error_keeps_source() {
        use std::error::Error;

        let error = CopyError::Transfer {
            path: PathBuf::from("sub/b.txt"),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("sub/b.txt"));
        assert!(error.is_transfer_error());
        assert_eq!(error.stage(), CopyStage::Copying);

        let source = error.source().expect("transfer error has a source");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn test_create_directory_is_validation_stage() {
        let error = CopyError::CreateDirectory {
            path: PathBuf::from("/ro/dest"),
            source: IoError::new(ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(error.stage(), CopyStage::Validating);
        assert!(!error.is_validation_error());
    }

    #[test]
    fn test_config_error() {
        let error = CopyError::Config("jobs must be at least 1".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert_eq!(error.stage(), CopyStage::Configuring);
        assert_eq!(error.stage().to_string(), "configuring");
    }
}
