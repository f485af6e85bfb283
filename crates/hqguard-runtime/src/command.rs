//! Command builders for the `hq` server subcommands.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

fn server_command(hq: &Path, subcommand: &str) -> Command {
    let mut cmd = Command::new(hq);
    cmd.arg("server").arg(subcommand).stdin(Stdio::null());
    cmd
}

/// `hq server info [--server-dir <dir>]`, output discarded.
pub fn status(hq: &Path, server_dir: Option<&Path>) -> Command {
    let mut cmd = server_command(hq, "info");
    if let Some(dir) = server_dir {
        cmd.arg("--server-dir").arg(dir);
    }
    cmd.stdout(Stdio::null()).stderr(Stdio::null());
    cmd
}

/// `hq server start --server-dir <dir>`, detached from our process group.
///
/// The caller chooses where stdout and stderr go.
pub fn start(hq: &Path, server_dir: &Path) -> Command {
    let mut cmd = server_command(hq, "start");
    cmd.arg("--server-dir").arg(server_dir).kill_on_drop(false);
    #[cfg(unix)]
    cmd.process_group(0);
    cmd
}

/// `hq server stop --server-dir <dir>`, output discarded.
pub fn stop(hq: &Path, server_dir: &Path) -> Command {
    let mut cmd = server_command(hq, "stop");
    cmd.arg("--server-dir")
        .arg(server_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}
