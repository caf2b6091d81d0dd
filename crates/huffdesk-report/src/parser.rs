//! Line-oriented decoder for the codec's verbose output.
//!
//! # Design
//! - Single pass with one piece of state: whether the symbol table is open.
//! - Known markers are recognised positively; everything else is ignored, so logging
//!   interleaved with the report never turns into table rows.
//! - A malformed row is skipped without closing the table.

use crate::labels::{CODE_HEADER, HEADER_WORDS, INDEX_HEADER, TABLE_START_MARKERS, match_label};
use crate::model::{DiagnosticReport, SymbolRecord};

/// Decode the codec's verbose output into a [`DiagnosticReport`].
///
/// Never fails; fields that cannot be recovered are left as `None`.
#[must_use]
pub fn parse(text: &str) -> DiagnosticReport {
    let mut decoder = Decoder::default();
    for line in text.lines() {
        decoder.consume(line.trim());
    }
    decoder.report
}

#[derive(Default)]
struct Decoder {
    report: DiagnosticReport,
    in_table: bool,
}

impl Decoder {
    fn consume(&mut self, line: &str) {
        if let Some((variant, rest)) = match_label(line) {
            variant.field.apply(rest, &mut self.report);
            return;
        }
        if TABLE_START_MARKERS.iter().any(|marker| line.contains(marker)) {
            self.in_table = true;
            return;
        }
        if is_header(line) || is_separator(line) {
            return;
        }
        if !self.in_table {
            return;
        }
        if line.is_empty() {
            self.in_table = false;
            return;
        }
        if let Some(record) = parse_row(line) {
            self.report.symbols.push(record);
        }
    }
}

fn is_header(line: &str) -> bool {
    line.split_whitespace().next() == Some(INDEX_HEADER)
        || HEADER_WORDS.iter().all(|word| line.contains(word))
}

fn is_separator(line: &str) -> bool {
    let rule = line.len() >= 3 && line.chars().all(|ch| ch == '-' || ch == '=');
    let banner = line.len() >= 6 && line.starts_with("===") && line.ends_with("===");
    rule || banner
}

fn parse_row(line: &str) -> Option<SymbolRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [index, symbol, frequency, code, rest @ ..] = tokens.as_slice() else {
        return None;
    };

    let index = index.parse::<i64>().ok()?;
    let frequency = frequency.parse::<u64>().ok()?;
    if *code == CODE_HEADER || !code.chars().all(|ch| ch == '0' || ch == '1') {
        return None;
    }

    let code_bits = u32::try_from(code.len()).unwrap_or(u32::MAX);
    let bits = rest
        .first()
        .and_then(|token| token.parse::<u32>().ok())
        .filter(|bits| *bits > 0)
        .unwrap_or(code_bits);

    Some(SymbolRecord {
        index,
        symbol: (*symbol).to_string(),
        frequency,
        code: (*code).to_string(),
        bits,
    })
}
