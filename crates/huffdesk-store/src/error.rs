//! # Design
//!
//! - Constant-message errors; paths and limits travel as fields.
//! - `PathNotFound` is kept distinct from other IO failures because callers treat it as benign.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for artifact store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An upload exceeded the configured maximum size.
    #[error("payload exceeds upload limit")]
    PayloadTooLarge {
        /// Configured maximum in bytes.
        limit: u64,
        /// Bytes received when the limit was crossed.
        received: u64,
    },
    /// The requested artifact or directory does not exist.
    #[error("artifact path not found")]
    PathNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// A relative artifact reference was rejected.
    #[error("invalid artifact reference")]
    InvalidReference {
        /// Reference supplied by the caller.
        reference: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// IO failures while interacting with the filesystem.
    #[error("artifact store io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl StoreError {
    /// Map an IO error, turning `NotFound` into [`StoreError::PathNotFound`].
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::PathNotFound { path }
        } else {
            Self::Io {
                operation,
                path,
                source,
            }
        }
    }

    pub(crate) fn invalid_reference(reference: &str, reason: &'static str) -> Self {
        Self::InvalidReference {
            reference: reference.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_io_errors_become_path_not_found() {
        let err = StoreError::io(
            "read_dir",
            "/srv/extracted/x",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, StoreError::PathNotFound { ref path } if path.ends_with("x")));
        assert_eq!(err.to_string(), "artifact path not found");
    }

    #[test]
    fn other_io_errors_keep_their_operation() {
        let err = StoreError::io(
            "create_file",
            "/srv/incoming/a",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        match err {
            StoreError::Io { operation, .. } => assert_eq!(operation, "create_file"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
