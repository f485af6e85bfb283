//! `ServerControl` implementation backed by the `hq` binary.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;
use hqguard_core::{
    LaunchLock, LaunchedServer, ProcessError, ServerControl, ServerLayout, ServerOutput,
    ServerStatus, StartRequest, StopOutcome,
};
use tokio::process::Child;
use tracing::{debug, info, warn};

use crate::binary::resolve_hq_binary;
use crate::shutdown::{is_server_for, kill_pid, pid_exists, shutdown_child};
use crate::{command, lock, pidfile};

/// Drives a HyperQueue server through the `hq` command line.
///
/// Servers started by this instance are kept as `Child` handles so early
/// exits can be observed; dropping the instance leaves them running.
pub struct HqServerControl {
    hq: PathBuf,
    launched: Mutex<HashMap<u32, Child>>,
}

impl HqServerControl {
    /// Use `hq` at an already validated path.
    pub fn new(hq: impl Into<PathBuf>) -> Self {
        Self {
            hq: hq.into(),
            launched: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the binary (explicit path, name, or `hq` on `PATH`) first.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ProcessError> {
        let hq = resolve_hq_binary(explicit)?;
        debug!("Using hq binary at {}", hq.display());
        Ok(Self::new(hq))
    }

    fn spawn_failed(&self, err: &std::io::Error) -> ProcessError {
        ProcessError::SpawnFailed {
            program: self.hq.display().to_string(),
            reason: err.to_string(),
        }
    }

    fn take_child(&self, pid: u32) -> Option<Child> {
        self.launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&pid)
    }

    fn output_streams(request: &StartRequest) -> Result<(Stdio, Stdio), ProcessError> {
        match request.output {
            ServerOutput::Discard => Ok((Stdio::null(), Stdio::null())),
            ServerOutput::LogFile => {
                // Truncates the previous server's log
                let log = File::create(&request.log_path)?;
                let err = log.try_clone()?;
                Ok((Stdio::from(log), Stdio::from(err)))
            }
        }
    }
}

#[async_trait]
impl ServerControl for HqServerControl {
    async fn status(&self, server_dir: Option<PathBuf>) -> Result<ServerStatus, ProcessError> {
        let status = command::status(&self.hq, server_dir.as_deref())
            .status()
            .await
            .map_err(|e| self.spawn_failed(&e))?;

        debug!(code = ?status.code(), "hq server info finished");
        Ok(if status.success() {
            ServerStatus::Running
        } else {
            ServerStatus::NotRunning
        })
    }

    async fn start(&self, request: &StartRequest) -> Result<LaunchedServer, ProcessError> {
        let (stdout, stderr) = Self::output_streams(request)?;

        let mut cmd = command::start(&self.hq, &request.server_dir);
        cmd.stdout(stdout).stderr(stderr);

        let child = cmd.spawn().map_err(|e| self.spawn_failed(&e))?;
        let pid = child.id().ok_or_else(|| {
            ProcessError::StartFailed("server exited before its PID was known".to_string())
        })?;

        pidfile::write_pidfile(&request.pid_path, pid)?;
        info!(pid, "Launched hq server");

        self.launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(pid, child);

        Ok(LaunchedServer {
            pid,
            server_dir: request.server_dir.clone(),
        })
    }

    async fn exit_code(&self, server: &LaunchedServer) -> Result<Option<i32>, ProcessError> {
        let mut launched = self
            .launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let Some(child) = launched.get_mut(&server.pid) else {
            // Not ours to observe; fall back to existence
            return Ok((!pid_exists(server.pid)).then_some(0));
        };

        match child.try_wait()? {
            // Killed by a signal: no code, still a failure
            Some(status) => Ok(Some(status.code().unwrap_or(-1))),
            None => Ok(None),
        }
    }

    async fn stop(&self, layout: &ServerLayout) -> Result<StopOutcome, ProcessError> {
        let server_dir = layout.server_dir();
        let pid_path = layout.pid_path();
        let recorded = pidfile::read_pidfile(&pid_path).ok();

        let status = command::stop(&self.hq, server_dir)
            .status()
            .await
            .map_err(|e| self.spawn_failed(&e))?;

        let outcome = if status.success() {
            info!("hq server stop succeeded");
            if let Some(child) = recorded.and_then(|data| self.take_child(data.pid)) {
                // Reap our own child so it does not linger as a zombie
                shutdown_child(child).await?;
            }
            StopOutcome::Stopped
        } else if let Some(data) = recorded {
            if let Some(child) = self.take_child(data.pid) {
                shutdown_child(child)
                    .await
                    .map_err(|e| ProcessError::StopFailed(e.to_string()))?;
                StopOutcome::Killed { pid: data.pid }
            } else if pid_exists(data.pid) && is_server_for(data.pid, server_dir) {
                warn!(pid = data.pid, "hq server stop failed, signalling recorded PID");
                kill_pid(data.pid)
                    .await
                    .map_err(|e| ProcessError::StopFailed(e.to_string()))?;
                StopOutcome::Killed { pid: data.pid }
            } else {
                debug!(pid = data.pid, "Recorded PID is gone or not an hq server");
                StopOutcome::NotRunning
            }
        } else {
            StopOutcome::NotRunning
        };

        pidfile::delete_pidfile(&pid_path)?;
        Ok(outcome)
    }

    async fn acquire_launch_lock(&self, path: &Path) -> Result<LaunchLock, ProcessError> {
        lock::acquire(path).await
    }
}
