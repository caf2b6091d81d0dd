//! Invocation inputs and captured output.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Direction of a codec run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecMode {
    /// Build an archive from one input file.
    Compress,
    /// Restore the files stored in an archive.
    Extract,
}

impl CodecMode {
    /// Command-line switch selecting the mode.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Compress => "-e",
            Self::Extract => "-d",
        }
    }

    /// Stable lowercase label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::Extract => "extract",
        }
    }
}

/// One codec run: compress writes `output` as a file, extract writes into `output` as a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecRequest {
    /// Direction of the run.
    pub mode: CodecMode,
    /// File handed to the codec.
    pub input: PathBuf,
    /// Output file (compress) or directory (extract).
    pub output: PathBuf,
}

impl CodecRequest {
    /// Argument vector passed to the codec; verbose output is always requested.
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from(self.mode.flag()),
            OsString::from("-v"),
            self.input.clone().into_os_string(),
            OsString::from("-o"),
            self.output.clone().into_os_string(),
        ]
    }
}

/// Text captured from a run that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecOutput {
    /// Everything the codec printed to stdout.
    pub stdout: String,
    /// Everything the codec printed to stderr.
    pub stderr: String,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}
