//! Jobs, their lifecycle and assembled results.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use huffdesk_codec::CodecMode;
use huffdesk_report::DiagnosticReport;
use huffdesk_store::{ARCHIVE_SUFFIX, Artifact, ArtifactId, StagedArtifact};
use tracing::debug;

/// Operation requested by an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Build an archive from the upload.
    Compress,
    /// Restore the files stored in an uploaded archive.
    Extract,
}

impl JobKind {
    /// Stable lowercase label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::Extract => "extract",
        }
    }

    /// Codec mode running this kind of job.
    #[must_use]
    pub const fn codec_mode(self) -> CodecMode {
        match self {
            Self::Compress => CodecMode::Compress,
            Self::Extract => CodecMode::Extract,
        }
    }
}

/// Classify an upload by name alone: archive suffix means extract, anything else compress.
#[must_use]
pub fn classify(name: &str) -> JobKind {
    let name = name.trim();
    let suffix_len = ARCHIVE_SUFFIX.len();
    let is_archive = name.len() >= suffix_len
        && name
            .get(name.len() - suffix_len..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(ARCHIVE_SUFFIX));
    if is_archive {
        JobKind::Extract
    } else {
        JobKind::Compress
    }
}

/// Lifecycle of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Upload accepted, not yet on disk.
    Received,
    /// Upload written to `incoming/`.
    Staged,
    /// Codec running.
    Invoking,
    /// Codec finished; report being decoded.
    ParsingOutput,
    /// Result assembled.
    Assembled,
    /// Job ended with a failure record.
    Failed,
}

impl JobState {
    /// Stable lowercase label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Staged => "staged",
            Self::Invoking => "invoking",
            Self::ParsingOutput => "parsing_output",
            Self::Assembled => "assembled",
            Self::Failed => "failed",
        }
    }
}

/// One user-initiated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Id shared with the staged upload.
    pub id: ArtifactId,
    /// Operation chosen by [`classify`].
    pub kind: JobKind,
    /// Filename as the user supplied it.
    pub display_name: String,
    /// Staged upload the job runs on.
    pub source: StagedArtifact,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub state: JobState,
}

impl Job {
    pub(crate) fn staged(display_name: &str, source: StagedArtifact) -> Self {
        let job = Self {
            id: source.id,
            kind: classify(display_name),
            display_name: display_name.to_string(),
            source,
            created_at: Utc::now(),
            state: JobState::Staged,
        };
        debug!(job_id = %job.id, kind = job.kind.as_str(), state = job.state.as_str(), "job created");
        job
    }

    pub(crate) fn advance(&mut self, next: JobState) {
        debug!(
            job_id = %self.id,
            from = self.state.as_str(),
            to = next.as_str(),
            "job state changed"
        );
        self.state = next;
    }
}

/// Result of a compress job.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedReport {
    /// Job that produced the archive.
    pub job: Job,
    /// Produced archive as seen on disk.
    pub produced: Artifact,
    /// Statistics decoded from the codec output, unmodified.
    pub stats: DiagnosticReport,
    /// Raw codec output.
    pub output: String,
}

impl CompressedReport {
    /// Archive size measured on disk, which takes precedence over any reported size.
    #[must_use]
    pub const fn compressed_size(&self) -> u64 {
        self.produced.size
    }
}

/// Result of an extract job.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveReport {
    /// Job that extracted the archive.
    pub job: Job,
    /// Directory holding the restored files.
    pub directory: PathBuf,
    /// Reference of `directory` relative to the data root.
    pub directory_reference: String,
    /// Restored files, sorted by name, with sizes from disk.
    pub files: Vec<Artifact>,
    /// Statistics decoded from the codec output, unmodified.
    pub stats: DiagnosticReport,
    /// Raw codec output.
    pub output: String,
}

/// Assembled result of a successful job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobReport {
    /// A compress job finished.
    Compressed(CompressedReport),
    /// An extract job finished.
    Archive(ArchiveReport),
}

impl JobReport {
    /// Job the report belongs to.
    #[must_use]
    pub const fn job(&self) -> &Job {
        match self {
            Self::Compressed(report) => &report.job,
            Self::Archive(report) => &report.job,
        }
    }

    /// Decoded statistics.
    #[must_use]
    pub const fn stats(&self) -> &DiagnosticReport {
        match self {
            Self::Compressed(report) => &report.stats,
            Self::Archive(report) => &report.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_suffix_routes_to_extract() {
        for name in ["bundle.huf", "BUNDLE.HUF", "a.b.Huf", " spaced.huf ", ".huf"] {
            assert_eq!(classify(name), JobKind::Extract, "{name}");
        }
    }

    #[test]
    fn everything_else_routes_to_compress() {
        for name in ["notes.txt", "bundle.huff", "huf", "bundle.huf.txt", "", "résumé.pdf", "x.hüf"] {
            assert_eq!(classify(name), JobKind::Compress, "{name}");
        }
    }

    #[test]
    fn kinds_select_codec_modes() {
        assert_eq!(JobKind::Compress.codec_mode(), CodecMode::Compress);
        assert_eq!(JobKind::Extract.codec_mode(), CodecMode::Extract);
        assert_eq!(JobKind::Extract.as_str(), "extract");
    }
}
