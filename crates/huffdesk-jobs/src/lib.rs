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

//! Job orchestration for uploaded files.
//!
//! Layout: `model.rs` (jobs, states, classification and assembled reports), `failure.rs`
//! (failure taxonomy), `orchestrator.rs` (`JobOrchestrator`), `housekeeping.rs`
//! (retention sweeps with metrics).

pub mod failure;
pub mod housekeeping;
pub mod model;
pub mod orchestrator;

pub use failure::{FailureKind, JobFailure};
pub use housekeeping::{spawn_sweep_scheduler, sweep_artifacts};
pub use model::{ArchiveReport, CompressedReport, Job, JobKind, JobReport, JobState, classify};
pub use orchestrator::JobOrchestrator;
