//! Structured view of one codec run.
//!
//! # Design
//! - Every scalar is optional so "not reported" stays distinct from "reported as zero".
//! - Symbol tokens are stored exactly as the codec printed them.

use serde::{Deserialize, Serialize};

/// Statistics recovered from the codec's verbose output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// Size of the uncompressed payload in bytes.
    pub original_size: Option<u64>,
    /// Size of the compressed payload in bytes, as claimed by the codec.
    pub compressed_size: Option<u64>,
    /// Space saving in percent; negative when the output grew.
    pub compression_ratio: Option<f64>,
    /// Shannon entropy estimate in bits per symbol.
    pub entropy_bits: Option<f64>,
    /// Achieved average code length in bits per symbol.
    pub average_code_length: Option<f64>,
    /// Code efficiency relative to the entropy bound, in percent.
    pub efficiency: Option<f64>,
    /// Number of files packed into or restored from the archive.
    pub file_count: Option<u64>,
    /// Number of entries in the archive's frequency table.
    pub table_entries: Option<u64>,
    /// Per-symbol rows in the order the codec printed them.
    #[serde(default)]
    pub symbols: Vec<SymbolRecord>,
}

impl DiagnosticReport {
    /// Returns `true` when no scalar field and no symbol row was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One row of the codec's per-symbol frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Row index as reported; not guaranteed to be zero-based or gapless.
    pub index: i64,
    /// Display token exactly as printed (`'a'`, `SPC`, `\n`, `[13]`, ...).
    pub symbol: String,
    /// Observed frequency of the symbol.
    pub frequency: u64,
    /// Assigned prefix code made of `0`/`1` characters.
    pub code: String,
    /// Code length in bits.
    pub bits: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn default_report_is_empty() {
        assert!(DiagnosticReport::default().is_empty());
        let report = DiagnosticReport {
            file_count: Some(0),
            ..DiagnosticReport::default()
        };
        assert!(!report.is_empty());
    }

    #[test]
    fn absent_fields_serialize_as_null() -> Result<(), Box<dyn Error>> {
        let report = DiagnosticReport {
            original_size: Some(12),
            ..DiagnosticReport::default()
        };
        let value = serde_json::to_value(&report)?;
        assert_eq!(value["original_size"], 12);
        assert!(value["compressed_size"].is_null());
        assert_eq!(value["symbols"], serde_json::json!([]));
        Ok(())
    }
}
