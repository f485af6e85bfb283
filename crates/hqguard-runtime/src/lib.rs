//! Process runtime for hqguard.
//!
//! Implements the `ServerControl` port from `hqguard-core` by running the
//! HyperQueue `hq` binary: liveness via `hq server info`, detached launch via
//! `hq server start`, shutdown via `hq server stop` with a signal fallback.
#![deny(unsafe_code)]

pub mod binary;
mod command;
mod control;
mod lock;
pub mod pidfile;
mod shutdown;

pub use binary::{DEFAULT_HQ_BINARY, HqBinaryError, resolve_hq_binary};
pub use control::HqServerControl;
