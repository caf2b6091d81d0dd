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

//! Shared test helpers used across huffdesk crates.
//! Layout: output.rs (canned codec reports), fake_codec.rs (shell scripts standing in for the codec).

pub mod fake_codec;
pub mod output;

pub use fake_codec::{FakeCodec, recorded_args};
