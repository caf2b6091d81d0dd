//! Fallback values applied when a variable is unset.

/// Default listen address.
pub const BIND_ADDR: &str = "127.0.0.1:50204";
/// Default root for the artifact directories.
pub const DATA_ROOT: &str = "./data";
/// Default codec executable.
pub const CODEC_PATH: &str = "./huff";
/// Default wall-clock bound for one codec invocation, in seconds.
pub const CODEC_TIMEOUT_SECS: u64 = 60;
/// Default upload ceiling (1 GiB).
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;
/// Default artifact retention, in seconds.
pub const RETENTION_SECS: u64 = 3600;
/// Default sweep interval; zero disables the scheduler.
pub const SWEEP_INTERVAL_SECS: u64 = 0;
/// Default log level.
pub const LOG_LEVEL: &str = "info";
