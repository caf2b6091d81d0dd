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

//! HTTP surface for huffdesk.
//!
//! Uploads are streamed into the artifact store and handed to the job orchestrator; the
//! assembled report (or a problem document) is returned as JSON. Artifacts are served back
//! by reference, and stale ones are reclaimed on request.
//!
//! Layout: `error.rs` (server errors), `models.rs` (response payloads and symbol labels),
//! `state.rs` (shared handler state), `http/` (router, handlers and middleware).

pub mod error;
pub(crate) mod http;
pub mod models;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use models::{
    ArchiveUpload, CleanupResponse, CompressedUpload, ExtractedFile, HealthResponse,
    ProblemDetails, StatsView, SymbolLabel, SymbolView, UploadResponse,
};
