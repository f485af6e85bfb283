//! Server control trait definition.
//!
//! This port defines what the guard needs from the external server tool.
//! Implementations handle all process lifecycle details internally.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProcessError;
use crate::config::ServerOutput;
use crate::paths::ServerLayout;

/// Result of the tool's liveness query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Running,
    NotRunning,
}

impl ServerStatus {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::NotRunning => f.write_str("not running"),
        }
    }
}

/// What to start and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub server_dir: PathBuf,
    pub output: ServerOutput,
    /// Target for [`ServerOutput::LogFile`].
    pub log_path: PathBuf,
    /// Where the launched PID is recorded.
    pub pid_path: PathBuf,
}

impl StartRequest {
    pub fn for_layout(layout: &ServerLayout, output: ServerOutput) -> Self {
        Self {
            server_dir: layout.server_dir().to_path_buf(),
            output,
            log_path: layout.log_path(),
            pid_path: layout.pid_path(),
        }
    }
}

/// Handle to a server process started by [`ServerControl::start`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchedServer {
    pub pid: u32,
    pub server_dir: PathBuf,
}

/// Result of [`ServerControl::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// The tool's own stop command succeeded.
    Stopped,
    /// The tool refused; the recorded PID was terminated instead.
    Killed { pid: u32 },
    NotRunning,
}

/// Exclusive hold on a server directory's launch lock.
///
/// The lock is released when this value is dropped.
pub struct LaunchLock {
    held: Option<Box<dyn Any + Send>>,
}

impl LaunchLock {
    /// A lock that guards nothing, for platforms without file locking.
    pub fn noop() -> Self {
        Self { held: None }
    }

    /// Keep `guard` alive for as long as the lock is held.
    pub fn holding<T: Send + 'static>(guard: T) -> Self {
        Self {
            held: Some(Box::new(guard)),
        }
    }

    pub const fn is_noop(&self) -> bool {
        self.held.is_none()
    }
}

impl fmt::Debug for LaunchLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchLock")
            .field("held", &self.held.is_some())
            .finish()
    }
}

/// Operations the guard needs from the external server tool.
///
/// # Lifecycle
///
/// 1. `acquire_launch_lock` serializes concurrent guards on one directory
/// 2. `status` decides whether anything needs to happen
/// 3. `start` launches the server detached from the caller
/// 4. `exit_code` lets readiness checks notice a server that died early
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServerControl: Send + Sync {
    /// Run the liveness query, optionally scoped to `server_dir`.
    ///
    /// A non-zero exit is `NotRunning`; failing to execute the tool is an error.
    async fn status(&self, server_dir: Option<PathBuf>) -> Result<ServerStatus, ProcessError>;

    /// Launch a detached server. Must not wait for it to exit.
    async fn start(&self, request: &StartRequest) -> Result<LaunchedServer, ProcessError>;

    /// Exit code of a launched server if it has already exited.
    async fn exit_code(&self, server: &LaunchedServer) -> Result<Option<i32>, ProcessError>;

    /// Stop the server that lives in `layout`.
    async fn stop(&self, layout: &ServerLayout) -> Result<StopOutcome, ProcessError>;

    /// Block until the launch lock at `path` is held exclusively.
    async fn acquire_launch_lock(&self, path: &Path) -> Result<LaunchLock, ProcessError>;
}
