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

//! Artifact storage for uploaded originals, produced archives and extracted file sets.
//!
//! Layout: `model.rs` (artifact types and sweep policy), `naming.rs` (artifact ids and
//! storage-safe names), `staging.rs` (size-capped upload writer), `store.rs`
//! (`ArtifactStore` paths, listing and reference resolution), `sweep.rs` (age-based
//! reclamation), `error.rs`.

pub mod error;
pub mod model;
pub mod naming;
pub mod staging;
pub mod store;
pub mod sweep;

pub use error::{StoreError, StoreResult};
pub use model::{Artifact, ArtifactClass, StagedArtifact, SweepPolicy, SweepReport};
pub use naming::ArtifactId;
pub use staging::StagingWriter;
pub use store::{ARCHIVE_SUFFIX, ArtifactStore};
