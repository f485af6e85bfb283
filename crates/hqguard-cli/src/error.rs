//! CLI-specific error types and mappings.
//!
//! Maps `GuardError` to exit codes and user-facing messages.

use hqguard_core::{ConfigError, GuardError, PathError, ProcessError};
use thiserror::Error;

use crate::presentation::ExportError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (server directory, PID file, log file).
    #[error("IO error: {0}")]
    Io(String),

    /// The hq binary is missing or cannot be executed.
    #[error("{0}")]
    Unavailable(String),

    /// Starting or stopping the server failed.
    #[error("Process error: {0}")]
    Process(String),

    /// The server did not become ready in time.
    #[error("{0}")]
    NotReady(String),

    /// The command given to `exec` could not be run.
    #[error("Failed to run {program}: {reason}")]
    Exec { program: String, reason: String },

    /// Output rendering failed.
    #[error("{0}")]
    Output(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,      // EX_CONFIG
            Self::Io(_) => 74,          // EX_IOERR
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Process(_) => 71,     // EX_OSERR
            Self::NotReady(_) => 75,    // EX_TEMPFAIL
            Self::Exec { .. } => 127,
            Self::Output(_) => 1,
        }
    }
}

impl From<ProcessError> for CliError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::BinaryNotFound { .. } | ProcessError::SpawnFailed { .. } => {
                Self::Unavailable(err.to_string())
            }
            ProcessError::ReadinessTimeout { .. } => Self::NotReady(err.to_string()),
            ProcessError::Io(_) | ProcessError::LockFailed { .. } => Self::Io(err.to_string()),
            ProcessError::StartFailed(_) | ProcessError::StopFailed(_) => {
                Self::Process(err.to_string())
            }
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<GuardError> for CliError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Path(e) => e.into(),
            GuardError::Config(e) => e.into(),
            GuardError::Process(e) => e.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        Self::Output(err.to_string())
    }
}
