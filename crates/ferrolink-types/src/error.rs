//! Error types and handling for FerroLink
//!
//! Errors are split by the scope they affect: a single pair (missing or
//! invalid source root), a single walk entry, or the whole run (bad
//! configuration, history log I/O). Per-file link failures are not errors
//! at this level; they are carried as [`crate::LinkOutcome::Failed`] values.

use std::path::{Path, PathBuf};

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - the entry is skipped, processing continues
    Low,
    /// Medium severity - the current pair cannot be processed
    Medium,
    /// High severity - the run cannot start
    High,
    /// Critical severity - the run must stop, recorded work may be lost
    Critical,
}

/// Main error type for FerroLink operations
#[derive(thiserror::Error, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// Source directory of a pair does not exist
    #[error("Source directory not found: {path}")]
    SourceNotFound {
        /// Path of the missing source directory
        path: PathBuf,
    },

    /// Source path of a pair exists but is not a directory
    #[error("Source path is not a directory: {path}")]
    NotADirectory {
        /// Offending source path
        path: PathBuf,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// History log could not be read or written
    #[error("History log error at '{path}': {message}")]
    History {
        /// Path of the history log
        path: PathBuf,
        /// Underlying I/O error message
        message: String,
    },

    /// A single entry could not be visited during a tree walk
    #[error("Failed to walk '{path}': {message}")]
    Walk {
        /// Path of the entry (or the walk root when unknown)
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Missing or invalid source roots
    NotFound,
    /// Configuration errors
    Config,
    /// History log errors
    History,
    /// Tree walk entry errors
    Walk,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::SourceNotFound { .. } | Self::NotADirectory { .. } => ErrorKind::NotFound,
            Self::Config { .. } => ErrorKind::Config,
            Self::History { .. } => ErrorKind::History,
            Self::Walk { .. } => ErrorKind::Walk,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Walk { .. } => ErrorSeverity::Low,
            Self::Io { .. } | Self::Other { .. } => ErrorSeverity::Medium,
            Self::SourceNotFound { .. } | Self::NotADirectory { .. } => ErrorSeverity::Medium,
            Self::Config { .. } => ErrorSeverity::High,
            Self::History { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether this error must stop the whole run
    pub fn is_fatal(&self) -> bool {
        self.severity() >= ErrorSeverity::High
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new history log error
    pub fn history<P: AsRef<Path>>(path: P, error: &std::io::Error) -> Self {
        Self::History {
            path: path.as_ref().to_path_buf(),
            message: error.to_string(),
        }
    }

    /// Create a new source-not-found error
    pub fn source_not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::SourceNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a new not-a-directory error
    pub fn not_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Self::NotADirectory {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a new walk error
    pub fn walk<P: AsRef<Path>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Walk {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    proptest! {
        #[test]
        fn test_error_severity_consistency(message in ".*") {
            let errors = vec![
                Error::Io { message: message.clone() },
                Error::Config { message: message.clone() },
                Error::Walk { path: PathBuf::from("/src"), message: message.clone() },
                Error::History { path: PathBuf::from("/h.txt"), message: message.clone() },
                Error::Other { message: message.clone() },
            ];

            for error in errors {
                // Only run-level errors may be fatal
                let fatal_kind = matches!(error.kind(), ErrorKind::Config | ErrorKind::History);
                prop_assert_eq!(error.is_fatal(), fatal_kind);
                prop_assert!(error.to_string().contains(message.as_str()));
            }
        }
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Low < ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }

    #[rstest]
    #[case(Error::source_not_found("/missing"), ErrorKind::NotFound, ErrorSeverity::Medium)]
    #[case(Error::not_a_directory("/file.txt"), ErrorKind::NotFound, ErrorSeverity::Medium)]
    #[case(Error::config("no pairs"), ErrorKind::Config, ErrorSeverity::High)]
    #[case(Error::walk("/src/locked", "permission denied"), ErrorKind::Walk, ErrorSeverity::Low)]
    fn test_error_classification(
        #[case] error: Error,
        #[case] kind: ErrorKind,
        #[case] severity: ErrorSeverity,
    ) {
        assert_eq!(error.kind(), kind);
        assert_eq!(error.severity(), severity);
    }

    #[test]
    fn test_pair_errors_are_not_fatal() {
        assert!(!Error::source_not_found("/missing").is_fatal());
        assert!(!Error::not_a_directory("/file.txt").is_fatal());
    }

    #[test]
    fn test_history_error_is_fatal() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::history("/var/lib/ferrolink/history.txt", &io_error);

        assert_eq!(error.kind(), ErrorKind::History);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(error.is_fatal());
        assert!(error.to_string().contains("history.txt"));
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test file");
        let error = Error::from(io_error);

        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.to_string().contains("test file"));
    }
}
