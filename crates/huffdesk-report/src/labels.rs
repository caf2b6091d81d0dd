//! Label-variant table for the codec's scalar statistics.
//!
//! # Design
//! - The codec has used several wordings for the same statistic across versions; each
//!   wording is one row in [`LABEL_VARIANTS`], so a new spelling is a data change.
//! - Values are taken from the text following the label, anchored on the unit marker.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::DiagnosticReport;

/// Scalar statistic a label populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    /// Uncompressed payload size.
    OriginalSize,
    /// Compressed payload size.
    CompressedSize,
    /// Space saving percentage.
    CompressionRatio,
    /// Shannon entropy estimate.
    EntropyBits,
    /// Average code length.
    AverageCodeLength,
    /// Efficiency percentage.
    Efficiency,
    /// Number of files in the archive.
    FileCount,
    /// Number of frequency table entries.
    TableEntries,
}

/// Unit marker a value must be adjacent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueUnit {
    /// Integer followed by `bytes`.
    Bytes,
    /// Decimal followed by `%`.
    Percent,
    /// Decimal followed by `bits`.
    Bits,
    /// First bare integer after the label.
    Count,
}

impl ReportField {
    /// Unit marker the field's value is anchored on.
    #[must_use]
    pub const fn unit(self) -> ValueUnit {
        match self {
            Self::OriginalSize | Self::CompressedSize => ValueUnit::Bytes,
            Self::CompressionRatio | Self::Efficiency => ValueUnit::Percent,
            Self::EntropyBits | Self::AverageCodeLength => ValueUnit::Bits,
            Self::FileCount | Self::TableEntries => ValueUnit::Count,
        }
    }

    /// Extract this field's value from `rest` and store it on `report`.
    ///
    /// Returns `false` and leaves the report untouched when no value could be extracted.
    pub fn apply(self, rest: &str, report: &mut DiagnosticReport) -> bool {
        match self.unit() {
            ValueUnit::Bytes | ValueUnit::Count => {
                let Some(value) = extract_integer(self.unit(), rest) else {
                    return false;
                };
                let slot = match self {
                    Self::OriginalSize => &mut report.original_size,
                    Self::CompressedSize => &mut report.compressed_size,
                    Self::FileCount => &mut report.file_count,
                    _ => &mut report.table_entries,
                };
                *slot = Some(value);
            }
            ValueUnit::Percent | ValueUnit::Bits => {
                let Some(value) = extract_decimal(self.unit(), rest) else {
                    return false;
                };
                let slot = match self {
                    Self::CompressionRatio => &mut report.compression_ratio,
                    Self::Efficiency => &mut report.efficiency,
                    Self::EntropyBits => &mut report.entropy_bits,
                    _ => &mut report.average_code_length,
                };
                *slot = Some(value);
            }
        }
        true
    }
}

/// One known spelling of a statistic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelVariant {
    /// Literal substring identifying the line.
    pub label: &'static str,
    /// Field populated by the line.
    pub field: ReportField,
}

const fn variant(label: &'static str, field: ReportField) -> LabelVariant {
    LabelVariant { label, field }
}

/// Every label spelling the decoder recognises, checked in order.
pub const LABEL_VARIANTS: &[LabelVariant] = &[
    variant("Original total size:", ReportField::OriginalSize),
    variant("Original size:", ReportField::OriginalSize),
    variant("Compressed data size:", ReportField::CompressedSize),
    variant("Compressed size:", ReportField::CompressedSize),
    variant("Compressed data:", ReportField::CompressedSize),
    variant("Actual compression ratio:", ReportField::CompressionRatio),
    variant("Compression ratio:", ReportField::CompressionRatio),
    variant("Shannon information:", ReportField::EntropyBits),
    variant("Shannon entropy:", ReportField::EntropyBits),
    variant("Huffman average:", ReportField::AverageCodeLength),
    variant("Average code length:", ReportField::AverageCodeLength),
    variant("Efficiency:", ReportField::Efficiency),
    variant("Files compressed:", ReportField::FileCount),
    variant("Number of files:", ReportField::FileCount),
    variant("Frequency table entries:", ReportField::TableEntries),
];

/// Banners that open the per-symbol table.
pub const TABLE_START_MARKERS: &[&str] = &[
    "CHARACTER FREQUENCY TABLE",
    "SYMBOL FREQUENCY TABLE",
    "HUFFMAN CODE TABLE",
];

/// Column words printed in the table header line.
pub(crate) const HEADER_WORDS: &[&str] = &["Char", "Freq", "Code"];

/// Header word for the code column; a row whose code equals it is a stray header.
pub(crate) const CODE_HEADER: &str = "Code";

/// Header word for the index column.
pub(crate) const INDEX_HEADER: &str = "Nr";

const NUMBER: &str = r"(-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?)";

static BYTES_VALUE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(&format!(r"{NUMBER}\s*bytes")).ok());
static PERCENT_VALUE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(&format!(r"{NUMBER}\s*%")).ok());
static BITS_VALUE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(&format!(r"{NUMBER}\s*bits")).ok());
static COUNT_VALUE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(NUMBER).ok());

/// Find the first label variant contained in `line`.
///
/// Returns the variant and the text following the label.
#[must_use]
pub fn match_label(line: &str) -> Option<(LabelVariant, &str)> {
    LABEL_VARIANTS.iter().find_map(|variant| {
        line.find(variant.label)
            .map(|start| (*variant, &line[start + variant.label.len()..]))
    })
}

fn capture<'t>(unit: ValueUnit, text: &'t str) -> Option<&'t str> {
    let pattern: &Option<Regex> = match unit {
        ValueUnit::Bytes => &BYTES_VALUE,
        ValueUnit::Percent => &PERCENT_VALUE,
        ValueUnit::Bits => &BITS_VALUE,
        ValueUnit::Count => &COUNT_VALUE,
    };
    pattern
        .as_ref()?
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
}

fn extract_integer(unit: ValueUnit, text: &str) -> Option<u64> {
    capture(unit, text).and_then(|raw| raw.parse::<u64>().ok())
}

fn extract_decimal(unit: ValueUnit, text: &str) -> Option<f64> {
    capture(unit, text)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_populates_its_field() {
        for variant in LABEL_VARIANTS {
            let sample = match variant.field.unit() {
                ValueUnit::Bytes => format!("{} 42 bytes", variant.label),
                ValueUnit::Percent => format!("{} 42.5%", variant.label),
                ValueUnit::Bits => format!("{} 4.25 bits/character", variant.label),
                ValueUnit::Count => format!("{} 42", variant.label),
            };
            let (matched, rest) = match_label(&sample).unwrap_or_else(|| {
                panic!("label {:?} was not recognised", variant.label);
            });
            assert_eq!(matched.field, variant.field, "label {:?}", variant.label);

            let mut report = DiagnosticReport::default();
            assert!(matched.field.apply(rest, &mut report), "{sample}");
            let populated = match variant.field {
                ReportField::OriginalSize => report.original_size == Some(42),
                ReportField::CompressedSize => report.compressed_size == Some(42),
                ReportField::CompressionRatio => report.compression_ratio == Some(42.5),
                ReportField::EntropyBits => report.entropy_bits == Some(4.25),
                ReportField::AverageCodeLength => report.average_code_length == Some(4.25),
                ReportField::Efficiency => report.efficiency == Some(42.5),
                ReportField::FileCount => report.file_count == Some(42),
                ReportField::TableEntries => report.table_entries == Some(42),
            };
            assert!(populated, "label {:?} did not populate its field", variant.label);
        }
    }

    #[test]
    fn byte_values_require_an_integer_next_to_the_unit() {
        assert_eq!(extract_integer(ValueUnit::Bytes, " 400 bytes (3200 bits)"), Some(400));
        assert_eq!(extract_integer(ValueUnit::Bytes, " 1.5 bytes"), None);
        assert_eq!(extract_integer(ValueUnit::Bytes, " unknown"), None);
    }

    #[test]
    fn ratio_keeps_its_sign() {
        assert_eq!(extract_decimal(ValueUnit::Percent, " -12.5%"), Some(-12.5));
        assert_eq!(extract_decimal(ValueUnit::Percent, " 60%"), Some(60.0));
        assert_eq!(extract_decimal(ValueUnit::Percent, " n/a"), None);
    }

    #[test]
    fn unrecognised_lines_do_not_match() {
        assert!(match_label("Reading file: notes.txt").is_none());
        assert!(match_label("").is_none());
    }

    #[test]
    fn failed_extraction_leaves_report_untouched() {
        let mut report = DiagnosticReport {
            original_size: Some(7),
            ..DiagnosticReport::default()
        };
        assert!(!ReportField::OriginalSize.apply(" unknown", &mut report));
        assert_eq!(report.original_size, Some(7));
    }
}
