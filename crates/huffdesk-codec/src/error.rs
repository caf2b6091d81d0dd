//! # Design
//!
//! - Constant messages; captured codec text rides along in fields so callers can attach it
//!   to failure records for debugging.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for codec invocations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while running the codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The run exceeded its wall-clock bound and the child was killed.
    #[error("codec timed out")]
    Timeout {
        /// Bound that was exceeded.
        timeout: Duration,
        /// Stdout captured before the kill.
        partial_stdout: String,
    },
    /// The codec process could not be started.
    #[error("failed to spawn codec")]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The codec exited unsuccessfully.
    #[error("codec exited unsuccessfully")]
    ExitStatus {
        /// Exit code, absent when the process was terminated by a signal.
        code: Option<i32>,
        /// Captured stdout.
        stdout: String,
        /// Captured stderr.
        stderr: String,
    },
    /// Waiting on the child or draining its pipes failed.
    #[error("codec io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl CodecError {
    /// Stable lowercase label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Spawn { .. } => "spawn",
            Self::ExitStatus { .. } => "exit_status",
            Self::Io { .. } => "io",
        }
    }

    /// Codec text captured before the failure, stdout first.
    #[must_use]
    pub fn captured_output(&self) -> Option<String> {
        let text = match self {
            Self::Timeout { partial_stdout, .. } => partial_stdout.clone(),
            Self::ExitStatus { stdout, stderr, .. } => match (stdout.is_empty(), stderr.is_empty()) {
                (false, false) => format!("{stdout}\n{stderr}"),
                (false, true) => stdout.clone(),
                _ => stderr.clone(),
            },
            Self::Spawn { .. } | Self::Io { .. } => String::new(),
        };
        Some(text).filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_output_joins_streams() {
        let err = CodecError::ExitStatus {
            code: Some(1),
            stdout: "Original size: 4 bytes".to_string(),
            stderr: "corrupt header".to_string(),
        };
        assert_eq!(
            err.captured_output().as_deref(),
            Some("Original size: 4 bytes\ncorrupt header")
        );
        assert_eq!(err.label(), "exit_status");
        assert_eq!(err.to_string(), "codec exited unsuccessfully");
    }

    #[test]
    fn empty_capture_is_absent() {
        let err = CodecError::Timeout {
            timeout: Duration::from_secs(1),
            partial_stdout: "  \n".to_string(),
        };
        assert!(err.captured_output().is_none());
        let spawn = CodecError::Spawn {
            program: PathBuf::from("huff"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(spawn.captured_output().is_none());
        assert_eq!(spawn.label(), "spawn");
    }
}
