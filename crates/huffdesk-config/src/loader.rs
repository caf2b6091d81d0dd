//! Environment parsing and validation.
//!
//! # Design
//! - All lookups go through a caller-supplied function so tests never touch the
//!   process environment.
//! - Empty values count as unset.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{CodecSettings, ServiceConfig};

/// Prefix shared by every recognised variable.
pub const ENV_PREFIX: &str = "HUFFDESK_";

const BIND_ADDR: &str = "HUFFDESK_BIND_ADDR";
const DATA_ROOT: &str = "HUFFDESK_DATA_ROOT";
const CODEC_PATH: &str = "HUFFDESK_CODEC_PATH";
const CODEC_WORKDIR: &str = "HUFFDESK_CODEC_WORKDIR";
const CODEC_TIMEOUT_SECS: &str = "HUFFDESK_CODEC_TIMEOUT_SECS";
const MAX_UPLOAD_BYTES: &str = "HUFFDESK_MAX_UPLOAD_BYTES";
const RETENTION_SECS: &str = "HUFFDESK_RETENTION_SECS";
const SWEEP_INTERVAL_SECS: &str = "HUFFDESK_SWEEP_INTERVAL_SECS";
const LOG_LEVEL: &str = "HUFFDESK_LOG_LEVEL";
const LOG_FORMAT: &str = "HUFFDESK_LOG_FORMAT";

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when a variable is set to a value that fails validation.
pub fn load_from_env() -> ConfigResult<ServiceConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration through `lookup`, which maps a variable name to its value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when a variable is set to a value that fails validation.
pub fn load_with<F>(lookup: F) -> ConfigResult<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &'static str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let bind_addr = match read(BIND_ADDR) {
        Some(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::invalid(BIND_ADDR, "not a socket address", &raw))?,
        None => defaults::BIND_ADDR
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::invalid(BIND_ADDR, "not a socket address", defaults::BIND_ADDR))?,
    };

    let codec_timeout = read_secs(&read, CODEC_TIMEOUT_SECS, defaults::CODEC_TIMEOUT_SECS)?;
    if codec_timeout.is_zero() {
        return Err(ConfigError::invalid(CODEC_TIMEOUT_SECS, "must be positive", "0"));
    }

    let max_upload_bytes = read_u64(&read, MAX_UPLOAD_BYTES, defaults::MAX_UPLOAD_BYTES)?;
    if max_upload_bytes == 0 {
        return Err(ConfigError::invalid(MAX_UPLOAD_BYTES, "must be positive", "0"));
    }

    let retention = read_secs(&read, RETENTION_SECS, defaults::RETENTION_SECS)?;
    let sweep_interval = Some(read_secs(
        &read,
        SWEEP_INTERVAL_SECS,
        defaults::SWEEP_INTERVAL_SECS,
    )?)
    .filter(|interval| !interval.is_zero());

    let log_format = match read(LOG_FORMAT) {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "json" | "pretty" => Some(raw.to_ascii_lowercase()),
            _ => return Err(ConfigError::invalid(LOG_FORMAT, "expected json or pretty", &raw)),
        },
        None => None,
    };

    Ok(ServiceConfig {
        bind_addr,
        data_root: read(DATA_ROOT).map_or_else(|| PathBuf::from(defaults::DATA_ROOT), PathBuf::from),
        codec: CodecSettings {
            program: read(CODEC_PATH)
                .map_or_else(|| PathBuf::from(defaults::CODEC_PATH), PathBuf::from),
            working_dir: read(CODEC_WORKDIR).map(PathBuf::from),
            timeout: codec_timeout,
        },
        max_upload_bytes,
        retention,
        sweep_interval,
        log_level: read(LOG_LEVEL).unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
        log_format,
    })
}

fn read_u64<R>(read: &R, key: &'static str, fallback: u64) -> ConfigResult<u64>
where
    R: Fn(&'static str) -> Option<String>,
{
    read(key).map_or_else(
        || {
            debug!(variable = key, value = fallback, "using default");
            Ok(fallback)
        },
        |raw| {
            raw.parse::<u64>()
                .map_err(|_| ConfigError::invalid(key, "not a non-negative integer", &raw))
        },
    )
}

fn read_secs<R>(read: &R, key: &'static str, fallback: u64) -> ConfigResult<Duration>
where
    R: Fn(&'static str) -> Option<String>,
{
    read_u64(read, key, fallback).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> ConfigResult<ServiceConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        load_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() -> ConfigResult<()> {
        let config = load(&[])?;
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:50204");
        assert_eq!(config.data_root, PathBuf::from("./data"));
        assert_eq!(config.codec.program, PathBuf::from("./huff"));
        assert!(config.codec.working_dir.is_none());
        assert_eq!(config.codec.timeout, Duration::from_secs(60));
        assert_eq!(config.max_upload_bytes, 1_073_741_824);
        assert_eq!(config.retention, Duration::from_secs(3600));
        assert!(config.sweep_interval.is_none());
        assert_eq!(config.log_level, "info");
        assert!(config.log_format.is_none());
        Ok(())
    }

    #[test]
    fn overrides_are_parsed() -> ConfigResult<()> {
        let config = load(&[
            ("HUFFDESK_BIND_ADDR", "0.0.0.0:8080"),
            ("HUFFDESK_DATA_ROOT", "/srv/huffdesk"),
            ("HUFFDESK_CODEC_PATH", "/opt/huff/bin/huff"),
            ("HUFFDESK_CODEC_WORKDIR", "/opt/huff"),
            ("HUFFDESK_CODEC_TIMEOUT_SECS", "5"),
            ("HUFFDESK_MAX_UPLOAD_BYTES", "1024"),
            ("HUFFDESK_RETENTION_SECS", "60"),
            ("HUFFDESK_SWEEP_INTERVAL_SECS", "300"),
            ("HUFFDESK_LOG_LEVEL", "debug"),
            ("HUFFDESK_LOG_FORMAT", "JSON"),
        ])?;
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.data_root, PathBuf::from("/srv/huffdesk"));
        assert_eq!(config.codec.working_dir, Some(PathBuf::from("/opt/huff")));
        assert_eq!(config.codec.timeout, Duration::from_secs(5));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.retention, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(300)));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format.as_deref(), Some("json"));
        Ok(())
    }

    #[test]
    fn blank_values_fall_back_to_defaults() -> ConfigResult<()> {
        let config = load(&[("HUFFDESK_DATA_ROOT", "   "), ("HUFFDESK_LOG_LEVEL", "")])?;
        assert_eq!(config.data_root, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let cases = [
            ("HUFFDESK_BIND_ADDR", "localhost", "not a socket address"),
            ("HUFFDESK_CODEC_TIMEOUT_SECS", "soon", "not a non-negative integer"),
            ("HUFFDESK_CODEC_TIMEOUT_SECS", "0", "must be positive"),
            ("HUFFDESK_MAX_UPLOAD_BYTES", "-1", "not a non-negative integer"),
            ("HUFFDESK_MAX_UPLOAD_BYTES", "0", "must be positive"),
            ("HUFFDESK_LOG_FORMAT", "xml", "expected json or pretty"),
        ];
        for (key, value, expected_reason) in cases {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidField { field, reason, .. }) => {
                    assert_eq!(field, key);
                    assert_eq!(reason, expected_reason);
                }
                Ok(_) => panic!("{key}={value} should be rejected"),
            }
        }
    }
}
