//! Port definitions (trait abstractions) for the external server tool.
//!
//! # Design Rules
//!
//! - No `tokio::process` types in any signature
//! - Intent-based methods (status, start, stop), not command lines
//! - Implementations own all process details

pub mod server_control;

use std::path::PathBuf;
use thiserror::Error;

pub use server_control::{
    LaunchLock, LaunchedServer, ServerControl, ServerStatus, StartRequest, StopOutcome,
};

#[cfg(test)]
pub use server_control::MockServerControl;

/// Domain-specific errors for server control operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The external tool could not be located.
    #[error("{binary} not found: {reason}")]
    BinaryNotFound { binary: String, reason: String },

    /// The external tool could not be executed at all.
    #[error("Failed to run {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    /// The server process was spawned but did not come up.
    #[error("Failed to start server: {0}")]
    StartFailed(String),

    /// The server could not be stopped.
    #[error("Failed to stop server: {0}")]
    StopFailed(String),

    /// The server did not answer the status query in time.
    #[error("Server in {server_dir} not ready after {attempts} status checks")]
    ReadinessTimeout { server_dir: PathBuf, attempts: u32 },

    /// The launch lock could not be taken.
    #[error("Failed to lock {path}: {reason}")]
    LockFailed { path: PathBuf, reason: String },

    /// Filesystem error while preparing or recording the server.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
