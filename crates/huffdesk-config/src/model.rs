//! Typed service settings.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the external codec executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecSettings {
    /// Executable path, resolved through `PATH` when relative without separators.
    pub program: PathBuf,
    /// Working directory for the child process; inherits the service's when `None`.
    pub working_dir: Option<PathBuf>,
    /// Hard wall-clock bound for one invocation.
    pub timeout: Duration,
}

/// Fully validated service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Listen address for the HTTP surface.
    pub bind_addr: SocketAddr,
    /// Root holding the `incoming`, `produced` and `extracted` directories.
    pub data_root: PathBuf,
    /// Codec invocation settings.
    pub codec: CodecSettings,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,
    /// Age after which artifacts are swept.
    pub retention: Duration,
    /// Interval for the background sweep; `None` leaves sweeping on demand.
    pub sweep_interval: Option<Duration>,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Explicit log format name (`json` or `pretty`); inferred from the build when `None`.
    pub log_format: Option<String>,
}
