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

//! Service configuration loaded from `HUFFDESK_*` environment variables.
//!
//! Layout: `defaults.rs` (documented fallbacks), `model.rs` (typed settings),
//! `loader.rs` (environment parsing and validation), `error.rs`.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_PREFIX, load_from_env, load_with};
pub use model::{CodecSettings, ServiceConfig};
