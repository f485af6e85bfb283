//! The server lifecycle guard.
//!
//! `Guard` orders the steps of "make sure a server is running here":
//! create the server directory, take the launch lock, ask the tool whether a
//! server is up, and start one if not. Whatever path was taken, it reports
//! the variable downstream commands should see.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ExportedVar, GuardConfig, Readiness, StatusScope};
use crate::paths::{PathError, ServerLayout, ensure_directory, remove_stale_files};
use crate::ports::{
    LaunchedServer, ProcessError, ServerControl, ServerStatus, StartRequest, StopOutcome,
};

/// Errors surfaced by [`Guard`] operations.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Which path [`Guard::ensure_running`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardOutcome {
    AlreadyRunning,
    Started { pid: u32 },
}

/// Result of [`Guard::ensure_running`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardReport {
    pub outcome: GuardOutcome,
    pub export: ExportedVar,
}

/// Ensures a single server is running per server directory.
pub struct Guard {
    control: Arc<dyn ServerControl>,
    config: GuardConfig,
    layout: ServerLayout,
}

impl Guard {
    /// Create a guard; the configuration is validated here.
    pub fn new(control: Arc<dyn ServerControl>, config: GuardConfig) -> Result<Self, GuardError> {
        config.validate()?;
        let layout = config.layout();
        Ok(Self {
            control,
            config,
            layout,
        })
    }

    pub const fn layout(&self) -> &ServerLayout {
        &self.layout
    }

    /// The variable this guard publishes, independent of server state.
    pub fn exported_var(&self) -> ExportedVar {
        self.config.exported_var()
    }

    /// Run the configured liveness query.
    pub async fn status(&self) -> Result<ServerStatus, GuardError> {
        let scope = match self.config.status_scope {
            StatusScope::Implicit => None,
            StatusScope::ServerDir => Some(self.layout.server_dir().to_path_buf()),
        };
        Ok(self.control.status(scope).await?)
    }

    /// Start the server unless the status query says one is running.
    pub async fn ensure_running(&self) -> Result<GuardReport, GuardError> {
        let server_dir = self.layout.server_dir();
        ensure_directory(server_dir)?;

        let _lock = self
            .control
            .acquire_launch_lock(&self.layout.lock_path())
            .await?;

        let outcome = if self.server_is_up().await? {
            info!("HyperQueue server already running");
            GuardOutcome::AlreadyRunning
        } else {
            let server = self.start().await?;
            GuardOutcome::Started { pid: server.pid }
        };

        Ok(GuardReport {
            outcome,
            export: self.exported_var(),
        })
    }

    /// Stop the server in this guard's directory.
    pub async fn stop(&self) -> Result<StopOutcome, GuardError> {
        if !self.layout.server_dir().is_dir() {
            debug!(
                "No server directory at {}, nothing to stop",
                self.layout.server_dir().display()
            );
            return Ok(StopOutcome::NotRunning);
        }

        let _lock = self
            .control
            .acquire_launch_lock(&self.layout.lock_path())
            .await?;
        Ok(self.control.stop(&self.layout).await?)
    }

    /// Liveness check made while holding the launch lock.
    ///
    /// An implicit query never sees a server we started with
    /// `--server-dir`, so the server directory is asked as well before
    /// deciding to start another one.
    async fn server_is_up(&self) -> Result<bool, GuardError> {
        if self.status().await?.is_running() {
            return Ok(true);
        }
        if self.config.status_scope == StatusScope::ServerDir {
            return Ok(false);
        }

        let server_dir = self.layout.server_dir().to_path_buf();
        let status = self.control.status(Some(server_dir)).await?;
        if status.is_running() {
            debug!("Found a server in the server directory");
        }
        Ok(status.is_running())
    }

    async fn start(&self) -> Result<LaunchedServer, GuardError> {
        if self.config.clean_stale {
            let removed = remove_stale_files(&self.layout)?;
            if !removed.is_empty() {
                info!("Removed {} stale file(s) from previous server", removed.len());
            }
        }

        let request = StartRequest::for_layout(&self.layout, self.config.server_output);
        info!(
            "Starting HyperQueue server in {}",
            request.server_dir.display()
        );
        let server = self.control.start(&request).await?;
        debug!(pid = server.pid, "HyperQueue server spawned");

        self.wait_until_ready(&server).await?;
        Ok(server)
    }

    async fn wait_until_ready(&self, server: &LaunchedServer) -> Result<(), GuardError> {
        match self.config.readiness {
            Readiness::FixedDelay(delay) => {
                sleep(delay).await;
                self.check_alive(server).await
            }
            Readiness::Poll { attempts, interval } => {
                for attempt in 1..=attempts {
                    self.check_alive(server).await?;

                    let status = self
                        .control
                        .status(Some(server.server_dir.clone()))
                        .await?;
                    if status.is_running() {
                        info!("HyperQueue server ready after {} check(s)", attempt);
                        return Ok(());
                    }

                    debug!(attempt, attempts, "Server not ready yet");
                    if attempt < attempts {
                        sleep(interval).await;
                    }
                }

                Err(ProcessError::ReadinessTimeout {
                    server_dir: server.server_dir.clone(),
                    attempts,
                }
                .into())
            }
        }
    }

    async fn check_alive(&self, server: &LaunchedServer) -> Result<(), GuardError> {
        match self.control.exit_code(server).await? {
            None => Ok(()),
            Some(0) => {
                warn!(pid = server.pid, "HyperQueue server exited right after start");
                Ok(())
            }
            Some(code) => Err(ProcessError::StartFailed(format!(
                "hq server (PID {}) exited with status {code}",
                server.pid
            ))
            .into()),
        }
    }
}
