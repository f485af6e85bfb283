//! Directory creation and stale state cleanup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PathError;
use super::layout::ServerLayout;

/// Create `path` (and its parents) unless it already exists.
///
/// An existing directory is left untouched. A path that exists but is not
/// a directory is an error.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!("Created server directory {}", path.display());
    Ok(())
}

/// Remove leftover state files of a previous server.
///
/// Returns the files that were actually removed. Missing files are skipped.
pub fn remove_stale_files(layout: &ServerLayout) -> Result<Vec<PathBuf>, PathError> {
    let mut removed = Vec::new();

    for path in layout.stale_files() {
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed stale {}", path.display());
                removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(PathError::RemoveFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(removed)
}
