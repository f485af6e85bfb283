//! Guard configuration and validation.
//!
//! These are pure domain types. Adapters (the CLI) fill them from flags and
//! environment variables, then call [`GuardConfig::validate`] once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::{PathError, ServerLayout};

/// Name of the server directory created under the working directory.
pub const DEFAULT_SERVER_DIR_NAME: &str = ".server";

/// Variable that downstream commands read to find the server.
pub const DEFAULT_ENV_VAR: &str = "HQ_SERVER_DIR";

/// Grace period after `hq server start` when readiness is not polled.
pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(1);

/// Default number of readiness checks in [`Readiness::Poll`] mode.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// Default pause between readiness checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How the guard decides a freshly started server is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Sleep for a fixed time and assume the server came up.
    FixedDelay(Duration),
    /// Re-run the status query against the server directory until it succeeds.
    Poll { attempts: u32, interval: Duration },
}

impl Default for Readiness {
    fn default() -> Self {
        Self::FixedDelay(DEFAULT_START_DELAY)
    }
}

impl Readiness {
    pub const fn poll_defaults() -> Self {
        Self::Poll {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Where the liveness query looks for a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusScope {
    /// `hq server info` with no `--server-dir`: the tool's own default location.
    #[default]
    Implicit,
    /// `hq server info --server-dir <server_dir>`.
    ServerDir,
}

/// What happens to the detached server's stdout and stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerOutput {
    #[default]
    Discard,
    /// Truncate and write to `<server_dir>/server.log`.
    LogFile,
}

/// Errors raised by [`GuardConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable name cannot be empty")]
    EmptyEnvVar,

    #[error("Invalid environment variable name: {0:?}")]
    InvalidEnvVar(String),

    #[error("Invalid server directory name: {0:?} (must be a single path component)")]
    InvalidServerDirName(String),

    #[error("Readiness polling needs at least one attempt")]
    ZeroAttempts,
}

/// Environment variable to publish for downstream commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedVar {
    pub name: String,
    pub value: PathBuf,
}

/// Everything the guard needs to know about one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Directory the server directory is created in.
    pub work_dir: PathBuf,
    pub server_dir_name: String,
    pub env_var: String,
    pub readiness: Readiness,
    pub status_scope: StatusScope,
    pub server_output: ServerOutput,
    /// Remove leftovers of a crashed server before starting a new one.
    pub clean_stale: bool,
}

impl GuardConfig {
    /// Configuration with defaults rooted at `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            server_dir_name: DEFAULT_SERVER_DIR_NAME.to_string(),
            env_var: DEFAULT_ENV_VAR.to_string(),
            readiness: Readiness::default(),
            status_scope: StatusScope::default(),
            server_output: ServerOutput::default(),
            clean_stale: true,
        }
    }

    /// Configuration with defaults rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self, PathError> {
        let cwd = std::env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
        Ok(Self::new(cwd))
    }

    #[must_use]
    pub fn with_server_dir_name(mut self, name: impl Into<String>) -> Self {
        self.server_dir_name = name.into();
        self
    }

    #[must_use]
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    #[must_use]
    pub const fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    #[must_use]
    pub const fn with_status_scope(mut self, scope: StatusScope) -> Self {
        self.status_scope = scope;
        self
    }

    #[must_use]
    pub const fn with_server_output(mut self, output: ServerOutput) -> Self {
        self.server_output = output;
        self
    }

    #[must_use]
    pub const fn with_clean_stale(mut self, clean: bool) -> Self {
        self.clean_stale = clean;
        self
    }

    pub fn layout(&self) -> ServerLayout {
        ServerLayout::new(&self.work_dir, &self.server_dir_name)
    }

    /// `<env_var>=<server_dir>/hq-current`, whatever the server state.
    pub fn exported_var(&self) -> ExportedVar {
        ExportedVar {
            name: self.env_var.clone(),
            value: self.layout().current_dir(),
        }
    }

    /// Check the configuration for values the guard cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_env_var(&self.env_var)?;

        let name = self.server_dir_name.as_str();
        let mut components = Path::new(name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(std::path::Component::Normal(_)), None)
        );
        if !single_normal || name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidServerDirName(name.to_string()));
        }

        if let Readiness::Poll { attempts: 0, .. } = self.readiness {
            return Err(ConfigError::ZeroAttempts);
        }

        Ok(())
    }
}

fn validate_env_var(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ConfigError::EmptyEnvVar);
    };

    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ConfigError::InvalidEnvVar(name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_script() {
        let config = GuardConfig::new("/work");
        assert_eq!(config.env_var, "HQ_SERVER_DIR");
        assert_eq!(config.readiness, Readiness::FixedDelay(Duration::from_secs(1)));
        assert_eq!(config.status_scope, StatusScope::Implicit);
        assert_eq!(config.server_output, ServerOutput::Discard);
        assert_eq!(config.layout().server_dir(), Path::new("/work/.server"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_env_var_names() {
        let config = GuardConfig::new("/work").with_env_var("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyEnvVar));

        for bad in ["1ABC", "HQ-DIR", "HQ DIR", "HQ=DIR"] {
            let config = GuardConfig::new("/work").with_env_var(bad);
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidEnvVar(bad.to_string())),
                "{bad} should be rejected"
            );
        }

        let config = GuardConfig::new("/work").with_env_var("_hq_dir2");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_dir_name_must_be_single_component() {
        for bad in ["", ".", "..", "a/b", "/abs"] {
            let config = GuardConfig::new("/work").with_server_dir_name(bad);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidServerDirName(_))),
                "{bad:?} should be rejected"
            );
        }

        let config = GuardConfig::new("/work").with_server_dir_name("hq-state");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn poll_needs_attempts() {
        let config = GuardConfig::new("/work").with_readiness(Readiness::Poll {
            attempts: 0,
            interval: Duration::ZERO,
        });
        assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));

        let config = GuardConfig::new("/work").with_readiness(Readiness::poll_defaults());
        assert!(config.validate().is_ok());
    }
}
