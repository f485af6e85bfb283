//! Layout of a HyperQueue server directory.
//!
//! ```text
//! <work_dir>/.server/
//! ├── hq-current/        written by `hq` once the server is up
//! ├── server.log         optional server output
//! ├── hqguard.pid        PID of the server we launched
//! └── hqguard.lock       launch lock
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Subdirectory `hq` creates for the active server instance.
pub const CURRENT_DIR_NAME: &str = "hq-current";

/// Files a crashed server can leave behind in the server directory.
///
/// They make a fresh `hq server start` refuse to run or pick up a dead
/// access token, so they are removed before starting.
pub const STALE_FILE_NAMES: [&str; 3] = ["access-token", "lock", "server.pid"];

const LOG_FILE_NAME: &str = "server.log";
const PID_FILE_NAME: &str = "hqguard.pid";
const LOCK_FILE_NAME: &str = "hqguard.lock";

/// Resolved locations inside one server directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerLayout {
    server_dir: PathBuf,
}

impl ServerLayout {
    /// Build the layout for `<work_dir>/<server_dir_name>`.
    pub fn new(work_dir: &Path, server_dir_name: &str) -> Self {
        Self {
            server_dir: work_dir.join(server_dir_name),
        }
    }

    /// Directory passed to `hq server start --server-dir`.
    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    /// Working directory of the active server; this is what gets exported.
    pub fn current_dir(&self) -> PathBuf {
        self.server_dir.join(CURRENT_DIR_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.server_dir.join(LOG_FILE_NAME)
    }

    pub fn pid_path(&self) -> PathBuf {
        self.server_dir.join(PID_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.server_dir.join(LOCK_FILE_NAME)
    }

    pub fn stale_files(&self) -> Vec<PathBuf> {
        STALE_FILE_NAMES
            .iter()
            .map(|name| self.server_dir.join(name))
            .collect()
    }
}

impl fmt::Display for ServerLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "server_dir = {}", self.server_dir.display())?;
        writeln!(f, "current_dir = {}", self.current_dir().display())?;
        writeln!(f, "log_path = {}", self.log_path().display())?;
        writeln!(f, "pid_path = {}", self.pid_path().display())?;
        write!(f, "lock_path = {}", self.lock_path().display())
    }
}
