//! Response payloads served by the API.
//!
//! # Design
//! - Payloads are built from domain reports and never feed back into them.
//! - Symbol labels are derived here for display; the parsed token stays verbatim.

use chrono::{DateTime, Utc};
use huffdesk_jobs::{ArchiveReport, CompressedReport, JobReport};
use huffdesk_report::{DiagnosticReport, SymbolRecord};
use huffdesk_store::{Artifact, SweepReport};
use huffdesk_telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// RFC9457-style problem document returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    /// Detailed diagnostic message when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Failure kind of the job, in `snake_case`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Codec text captured before the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Job the failure belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Result of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadResponse {
    /// The upload was compressed into an archive.
    Compressed(CompressedUpload),
    /// The upload was an archive and has been extracted.
    Archive(ArchiveUpload),
}

/// Payload for a finished compress job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompressedUpload {
    /// Job identifier.
    pub job_id: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// Download reference of the produced archive.
    pub compressed_file: String,
    /// Archive size measured on disk.
    pub compressed_size: u64,
    /// Statistics decoded from the codec output.
    pub stats: StatsView,
    /// Raw codec output.
    pub output: String,
}

/// Payload for a finished extract job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveUpload {
    /// Job identifier.
    pub job_id: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// Restored files, sorted by name.
    pub files: Vec<ExtractedFile>,
    /// Reference of the directory holding the restored files.
    pub decompressed_path: String,
    /// Statistics decoded from the codec output.
    pub stats: StatsView,
    /// Raw codec output.
    pub output: String,
}

/// One restored file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFile {
    /// File name.
    pub name: String,
    /// Size in bytes from the filesystem.
    pub size: u64,
    /// Download reference.
    pub path: String,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Decoded codec statistics; absent values serialize as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    /// Uncompressed size in bytes.
    pub original_size: Option<u64>,
    /// Compressed size in bytes as reported by the codec.
    pub compressed_size: Option<u64>,
    /// Space saving in percent.
    pub compression_ratio: Option<f64>,
    /// Shannon entropy estimate in bits per symbol.
    pub entropy_bits: Option<f64>,
    /// Average code length in bits per symbol.
    pub average_code_length: Option<f64>,
    /// Code efficiency in percent.
    pub efficiency: Option<f64>,
    /// Files packed or restored.
    pub file_count: Option<u64>,
    /// Entries in the archive's frequency table.
    pub table_entries: Option<u64>,
    /// Frequency table rows in codec order.
    pub symbols: Vec<SymbolView>,
}

/// One frequency table row with its display label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SymbolView {
    /// Row index as reported.
    pub index: i64,
    /// Token exactly as printed by the codec.
    pub symbol: String,
    /// Human-readable label for the token.
    pub label: String,
    /// Whether the label names a whitespace or control character.
    pub special: bool,
    /// Observed frequency.
    pub frequency: u64,
    /// Prefix code.
    pub code: String,
    /// Code length in bits.
    pub bits: u32,
}

/// Display label for a symbol token printed by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolLabel {
    /// `SPC`.
    Space,
    /// `\n`.
    Newline,
    /// `\r`.
    CarriageReturn,
    /// `\t`.
    Tab,
    /// `\0`.
    Null,
    /// A bracketed byte value such as `[13]`.
    NonPrintable(String),
    /// Any other token, with surrounding single quotes removed.
    Printable(String),
}

impl SymbolLabel {
    /// Classify a token without altering it.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "SPC" => Self::Space,
            "\\n" => Self::Newline,
            "\\r" => Self::CarriageReturn,
            "\\t" => Self::Tab,
            "\\0" => Self::Null,
            _ => {
                if let Some(code) = token
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    return Self::NonPrintable(code.to_string());
                }
                let unquoted = token
                    .strip_prefix('\'')
                    .and_then(|rest| rest.strip_suffix('\''))
                    .filter(|inner| !inner.is_empty());
                Self::Printable(unquoted.unwrap_or(token).to_string())
            }
        }
    }

    /// Text shown to users.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Space => "SPACE".to_string(),
            Self::Newline => "NEWLINE".to_string(),
            Self::CarriageReturn => "CARRIAGE RETURN".to_string(),
            Self::Tab => "TAB".to_string(),
            Self::Null => "NULL".to_string(),
            Self::NonPrintable(code) => format!("NON-PRINTABLE ({code})"),
            Self::Printable(text) => text.clone(),
        }
    }

    /// Whether the token stands for a whitespace or control character.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        !matches!(self, Self::Printable(_))
    }
}

impl From<&SymbolRecord> for SymbolView {
    fn from(record: &SymbolRecord) -> Self {
        let label = SymbolLabel::from_token(&record.symbol);
        Self {
            index: record.index,
            symbol: record.symbol.clone(),
            label: label.text(),
            special: label.is_special(),
            frequency: record.frequency,
            code: record.code.clone(),
            bits: record.bits,
        }
    }
}

impl From<&DiagnosticReport> for StatsView {
    fn from(report: &DiagnosticReport) -> Self {
        Self {
            original_size: report.original_size,
            compressed_size: report.compressed_size,
            compression_ratio: report.compression_ratio,
            entropy_bits: report.entropy_bits,
            average_code_length: report.average_code_length,
            efficiency: report.efficiency,
            file_count: report.file_count,
            table_entries: report.table_entries,
            symbols: report.symbols.iter().map(SymbolView::from).collect(),
        }
    }
}

impl From<&Artifact> for ExtractedFile {
    fn from(artifact: &Artifact) -> Self {
        Self {
            name: artifact.logical_name.clone(),
            size: artifact.size,
            path: artifact.reference.clone(),
            modified: artifact.modified,
        }
    }
}

impl From<&CompressedReport> for CompressedUpload {
    fn from(report: &CompressedReport) -> Self {
        Self {
            job_id: report.job.id.to_string(),
            original_name: report.job.display_name.clone(),
            compressed_file: report.produced.reference.clone(),
            compressed_size: report.compressed_size(),
            stats: StatsView::from(&report.stats),
            output: report.output.clone(),
        }
    }
}

impl From<&ArchiveReport> for ArchiveUpload {
    fn from(report: &ArchiveReport) -> Self {
        Self {
            job_id: report.job.id.to_string(),
            original_name: report.job.display_name.clone(),
            files: report.files.iter().map(ExtractedFile::from).collect(),
            decompressed_path: report.directory_reference.clone(),
            stats: StatsView::from(&report.stats),
            output: report.output.clone(),
        }
    }
}

impl From<&JobReport> for UploadResponse {
    fn from(report: &JobReport) -> Self {
        match report {
            JobReport::Compressed(report) => Self::Compressed(CompressedUpload::from(report)),
            JobReport::Archive(report) => Self::Archive(ArchiveUpload::from(report)),
        }
    }
}

/// Result of `DELETE /cleanup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    /// Completion message.
    pub message: String,
    /// Entries removed across all classes.
    pub removed: u64,
    /// Entries removed from `incoming/`.
    pub incoming: u64,
    /// Entries removed from `produced/`.
    pub produced: u64,
    /// Entries removed from `extracted/`.
    pub extracted: u64,
    /// Entries that could not be removed; they are retried on the next sweep.
    pub failures: u64,
}

impl From<SweepReport> for CleanupResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            message: "Cleanup completed".to_string(),
            removed: report.total_removed(),
            incoming: report.incoming,
            produced: report.produced,
            extracted: report.extracted,
            failures: report.failures,
        }
    }
}

/// Result of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Build identifier.
    pub build: String,
    /// Job and sweep counters.
    pub metrics: MetricsSnapshot,
}
