//! # Design
//!
//! - Every way a job can end badly maps to exactly one [`FailureKind`].
//! - Codec text captured before a failure is kept on the record for debugging; it is never
//!   turned into a report.

use huffdesk_codec::CodecError;
use huffdesk_store::{ArtifactId, StoreError};
use thiserror::Error;

/// Failure taxonomy for jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The upload exceeded the size limit.
    PayloadTooLarge,
    /// The request did not describe an operation that can be run.
    UnrecognizedOperation,
    /// The codec exceeded its wall-clock bound.
    CodecTimeout,
    /// The codec could not be started or exited unsuccessfully.
    CodecExecutionFailed,
    /// An artifact vanished or never existed.
    PathNotFound,
    /// Writing an artifact to disk failed.
    ArtifactWriteFailed,
    /// The codec reported success but its outputs could not be assembled.
    InternalAssemblyError,
}

impl FailureKind {
    /// Stable snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PayloadTooLarge => "payload_too_large",
            Self::UnrecognizedOperation => "unrecognized_operation",
            Self::CodecTimeout => "codec_timeout",
            Self::CodecExecutionFailed => "codec_execution_failed",
            Self::PathNotFound => "path_not_found",
            Self::ArtifactWriteFailed => "artifact_write_failed",
            Self::InternalAssemblyError => "internal_assembly_error",
        }
    }
}

/// Terminal failure of one job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job failed")]
pub struct JobFailure {
    /// Classified cause.
    pub kind: FailureKind,
    /// Human-readable description.
    pub message: String,
    /// Job the failure belongs to, once an id was assigned.
    pub job_id: Option<ArtifactId>,
    /// Codec text captured before the failure.
    pub output: Option<String>,
}

impl JobFailure {
    /// Failure of `kind` with a message and no captured output.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            job_id: None,
            output: None,
        }
    }

    /// Attach the owning job.
    #[must_use]
    pub const fn for_job(mut self, job_id: ArtifactId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Attach captured codec text.
    #[must_use]
    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    /// Classify a store failure raised while staging or writing artifacts.
    #[must_use]
    pub fn from_store(err: &StoreError) -> Self {
        match err {
            StoreError::PayloadTooLarge { limit, .. } => Self::new(
                FailureKind::PayloadTooLarge,
                format!("upload exceeds the {limit} byte limit"),
            ),
            StoreError::PathNotFound { path } => Self::new(
                FailureKind::PathNotFound,
                format!("{} does not exist", path.display()),
            ),
            StoreError::InvalidReference { reason, .. } => Self::new(
                FailureKind::PathNotFound,
                format!("artifact reference rejected: {reason}"),
            ),
            StoreError::Io {
                operation, source, ..
            } => Self::new(
                FailureKind::ArtifactWriteFailed,
                format!("{operation} failed: {source}"),
            ),
        }
    }

    /// Classify a codec failure, keeping whatever text it printed.
    #[must_use]
    pub fn from_codec(err: &CodecError) -> Self {
        let failure = match err {
            CodecError::Timeout { timeout, .. } => Self::new(
                FailureKind::CodecTimeout,
                format!("codec did not finish within {} s", timeout.as_secs_f64()),
            ),
            CodecError::Spawn { program, source } => Self::new(
                FailureKind::CodecExecutionFailed,
                format!("codec {} could not be started: {source}", program.display()),
            ),
            CodecError::ExitStatus { code, .. } => Self::new(
                FailureKind::CodecExecutionFailed,
                code.map_or_else(
                    || "codec was terminated by a signal".to_string(),
                    |code| format!("codec exited with status {code}"),
                ),
            ),
            CodecError::Io { operation, source } => Self::new(
                FailureKind::CodecExecutionFailed,
                format!("codec {operation} failed: {source}"),
            ),
        };
        failure.with_output(err.captured_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn store_errors_map_to_one_kind_each() {
        let cases = [
            (
                StoreError::PayloadTooLarge {
                    limit: 10,
                    received: 11,
                },
                FailureKind::PayloadTooLarge,
            ),
            (
                StoreError::PathNotFound {
                    path: PathBuf::from("/data/produced/x.huf"),
                },
                FailureKind::PathNotFound,
            ),
            (
                StoreError::Io {
                    operation: "write_chunk",
                    path: PathBuf::from("/data/incoming/x"),
                    source: io::Error::other("disk full"),
                },
                FailureKind::ArtifactWriteFailed,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(JobFailure::from_store(&err).kind, kind);
        }
    }

    #[test]
    fn codec_errors_keep_captured_output() {
        let timeout = JobFailure::from_codec(&CodecError::Timeout {
            timeout: Duration::from_secs(60),
            partial_stdout: "Reading file: a.txt".to_string(),
        });
        assert_eq!(timeout.kind, FailureKind::CodecTimeout);
        assert_eq!(timeout.output.as_deref(), Some("Reading file: a.txt"));

        let exit = JobFailure::from_codec(&CodecError::ExitStatus {
            code: None,
            stdout: String::new(),
            stderr: "killed".to_string(),
        });
        assert_eq!(exit.kind, FailureKind::CodecExecutionFailed);
        assert_eq!(exit.message, "codec was terminated by a signal");
        assert_eq!(exit.output.as_deref(), Some("killed"));
    }

    #[test]
    fn kind_identifiers_are_snake_case() {
        assert_eq!(FailureKind::CodecTimeout.as_str(), "codec_timeout");
        assert_eq!(
            FailureKind::InternalAssemblyError.as_str(),
            "internal_assembly_error"
        );
    }
}
