#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Decoder for the verbose diagnostic text printed by the Huffman codec.
//!
//! The codec has no structured output; everything this crate knows about a run is
//! recovered from free-form stdout. Decoding never fails: unknown lines are skipped and
//! values that cannot be extracted stay `None`.
//!
//! Layout: `model.rs` (report types), `labels.rs` (label-variant table and markers),
//! `parser.rs` (the line-oriented decoder).

pub mod labels;
pub mod model;
pub mod parser;

pub use labels::{LABEL_VARIANTS, LabelVariant, ReportField, TABLE_START_MARKERS, ValueUnit};
pub use model::{DiagnosticReport, SymbolRecord};
pub use parser::parse;
