//! Error types for output tree export.

use thiserror::Error;

/// Errors raised while collecting or exporting generated files.
#[derive(Error, Debug)]
pub enum FilesError {
    /// A relative path is not usable as an output location.
    ///
    /// Output paths must be relative, non-empty, and must not climb out of
    /// the output root.
    #[error("Invalid path: {path} ({reason})")]
    InvalidPath {
        /// Offending path
        path: String,
        /// Why the path was rejected
        reason: String,
    },

    /// Two artifacts map to the same output path.
    #[error("Duplicate output path: {path}")]
    DuplicatePath {
        /// Path produced more than once
        path: String,
    },

    /// Filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// Path the operation was applied to
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this is a duplicate path error.
    #[must_use]
    pub const fn is_duplicate_path(&self) -> bool {
        matches!(self, Self::DuplicatePath { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for output tree operations.
pub type Result<T> = std::result::Result<T, FilesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let err = FilesError::DuplicatePath {
            path: "a/B.kt".to_string(),
        };
        assert!(err.is_duplicate_path());
        assert!(!err.is_io_error());
        assert_eq!(err.to_string(), "Duplicate output path: a/B.kt");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = FilesError::io(
            std::path::Path::new("/out/A.kt"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_io_error());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/out/A.kt"));
    }
}
