//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the runtime adapter is wired to the
//! core guard. Handlers receive a `CliContext` and never touch
//! `HqServerControl` directly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hqguard_core::{
    ExportedVar, Guard, GuardConfig, Readiness, ServerLayout, ServerOutput, StatusScope,
};
use hqguard_runtime::{HqServerControl, resolve_hq_binary};

use crate::error::CliError;
use crate::parser::Cli;

/// Fully resolved configuration for CLI commands.
///
/// The `hq` binary is resolved lazily so that `env` and `paths` work on
/// machines without HyperQueue installed.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: GuardConfig,
    pub hq_bin: Option<PathBuf>,
}

impl CliContext {
    pub fn layout(&self) -> ServerLayout {
        self.config.layout()
    }

    pub fn exported_var(&self) -> ExportedVar {
        self.config.exported_var()
    }

    /// Resolved `hq` path, or why it could not be resolved.
    pub fn hq_path(&self) -> Result<PathBuf, CliError> {
        resolve_hq_binary(self.hq_bin.as_deref())
            .map_err(|e| CliError::Unavailable(e.to_string()))
    }

    /// Build a guard backed by the real `hq` binary.
    pub fn guard(&self) -> Result<Guard, CliError> {
        let control = HqServerControl::resolve(self.hq_bin.as_deref())?;
        Ok(Guard::new(Arc::new(control), self.config.clone())?)
    }
}

/// Translate parsed arguments into a validated `CliContext`.
pub fn bootstrap(cli: &Cli) -> Result<CliContext, CliError> {
    // Exported paths must survive a later `cd`
    let base = match &cli.work_dir {
        Some(dir) => GuardConfig::new(std::path::absolute(dir)?),
        None => GuardConfig::from_current_dir()?,
    };

    let readiness = if cli.wait_ready {
        Readiness::Poll {
            attempts: cli.attempts,
            interval: Duration::from_millis(cli.interval_ms),
        }
    } else {
        Readiness::FixedDelay(Duration::from_millis(cli.delay_ms))
    };

    let config = base
        .with_server_dir_name(cli.server_dir_name.clone())
        .with_env_var(cli.env_var.clone())
        .with_readiness(readiness)
        .with_status_scope(if cli.status_in_server_dir {
            StatusScope::ServerDir
        } else {
            StatusScope::Implicit
        })
        .with_server_output(if cli.server_log {
            ServerOutput::LogFile
        } else {
            ServerOutput::Discard
        })
        .with_clean_stale(!cli.keep_stale);

    config.validate()?;

    Ok(CliContext {
        config,
        hq_bin: cli.hq_bin.clone(),
    })
}
