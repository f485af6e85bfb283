//! PID file for the server launched by hqguard.
//!
//! Format: Two-line text file
//! ```text
//! <pid>
//! <started_at unix seconds>
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// PID file content parsed from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidFileData {
    pub pid: u32,
    pub started_at: u64,
}

/// Write PID file atomically using temp file + rename.
pub fn write_pidfile(path: &Path, pid: u32) -> io::Result<PidFileData> {
    let started_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let data = PidFileData { pid, started_at };

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, format!("{pid}\n{started_at}\n"))?;
    fs::rename(&temp_path, path)?;

    Ok(data)
}

pub fn read_pidfile(path: &Path) -> io::Result<PidFileData> {
    let content = fs::read_to_string(path)?;
    parse_pidfile_content(&content)
}

/// Delete PID file (idempotent - no error if missing).
pub fn delete_pidfile(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn parse_pidfile_content(content: &str) -> io::Result<PidFileData> {
    let mut lines = content.lines();

    let pid = lines
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid PID"))?;

    let started_at = lines
        .next()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or_default();

    Ok(PidFileData { pid, started_at })
}
