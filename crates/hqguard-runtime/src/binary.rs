//! `hq` binary availability checking and path resolution.

use std::path::{Path, PathBuf};

use hqguard_core::ProcessError;
use thiserror::Error;
use tracing::debug;

/// Name looked up on `PATH` when no explicit binary is configured.
pub const DEFAULT_HQ_BINARY: &str = "hq";

/// Errors that can occur when resolving or validating the `hq` binary.
#[derive(Debug, Error)]
pub enum HqBinaryError {
    /// An explicit path was given but nothing exists there.
    #[error("hq binary not found at: {path}")]
    NotFound { path: PathBuf },

    /// The file exists but cannot be executed.
    #[error("hq binary exists but is not executable: {path}")]
    NotExecutable { path: PathBuf },

    /// Lookup on `PATH` failed.
    #[error("{name} not found on PATH ({reason}). Install HyperQueue or pass --hq-bin")]
    NotOnPath { name: String, reason: String },
}

impl From<HqBinaryError> for ProcessError {
    fn from(err: HqBinaryError) -> Self {
        let binary = match &err {
            HqBinaryError::NotFound { path } | HqBinaryError::NotExecutable { path } => {
                path.display().to_string()
            }
            HqBinaryError::NotOnPath { name, .. } => name.clone(),
        };
        Self::BinaryNotFound {
            binary,
            reason: err.to_string(),
        }
    }
}

/// Resolve the `hq` binary.
///
/// Precedence:
/// 1. `explicit` containing a path separator: validated as a file path
/// 2. `explicit` bare name: looked up on `PATH`
/// 3. [`DEFAULT_HQ_BINARY`] on `PATH`
pub fn resolve_hq_binary(explicit: Option<&Path>) -> Result<PathBuf, HqBinaryError> {
    let candidate = explicit.unwrap_or_else(|| Path::new(DEFAULT_HQ_BINARY));

    if candidate.components().count() > 1 || candidate.is_absolute() {
        return validate_binary(candidate);
    }

    let resolved = which::which(candidate).map_err(|e| HqBinaryError::NotOnPath {
        name: candidate.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!("Resolved {} to {}", candidate.display(), resolved.display());
    Ok(resolved)
}

/// Validate that a binary exists and is executable.
fn validate_binary(path: &Path) -> Result<PathBuf, HqBinaryError> {
    if !path.is_file() {
        return Err(HqBinaryError::NotFound {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let executable = std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false);
        if !executable {
            return Err(HqBinaryError::NotExecutable {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(path.to_path_buf())
}
