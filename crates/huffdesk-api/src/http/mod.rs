//! HTTP routing, handlers and middleware.

pub(crate) mod artifacts;
pub(crate) mod constants;
pub(crate) mod errors;
pub(crate) mod health;
pub(crate) mod router;
pub(crate) mod telemetry;
pub(crate) mod upload;
