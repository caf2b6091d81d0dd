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

//! Runs the external codec as a child process under a hard wall-clock bound.
//!
//! Layout: `model.rs` (modes, requests, captured output), `invoker.rs` (`CodecRunner`
//! trait and the process-backed `CodecInvoker`), `error.rs`.

pub mod error;
pub mod invoker;
pub mod model;

pub use error::{CodecError, CodecResult};
pub use invoker::{CodecInvoker, CodecRunner, DEFAULT_TIMEOUT};
pub use model::{CodecMode, CodecOutput, CodecRequest};
