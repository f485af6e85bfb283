//! Terminate a detached server with SIGTERM → SIGKILL escalation.
//!
//! The server is started as the leader of its own process group, so signals
//! go to the whole group: `hq` and anything it spawned.

use std::io;
use std::path::Path;

use tokio::process::Child;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::{sleep, timeout};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

#[cfg(unix)]
const GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Shut down a server we still hold a `Child` handle for, and reap it.
pub async fn shutdown_child(mut child: Child) -> io::Result<()> {
    #[cfg(unix)]
    {
        let Some(pid) = child.id() else {
            // Already reaped
            return Ok(());
        };

        if let Err(e) = signal::killpg(to_nix_pid(pid), Signal::SIGTERM) {
            if e != Errno::ESRCH {
                return Err(io::Error::other(e));
            }
        }

        if timeout(GRACE_PERIOD, child.wait()).await.is_ok() {
            return Ok(());
        }

        let _ = signal::killpg(to_nix_pid(pid), Signal::SIGKILL);
        child.wait().await.map(|_| ())
    }

    #[cfg(not(unix))]
    {
        child.kill().await
    }
}

/// Kill a server process group by PID, without a `Child` handle.
///
/// Used when the server was launched by an earlier hqguard invocation.
/// Caller must verify the PID belongs to the server first.
pub async fn kill_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        let nix_pid = to_nix_pid(pid);

        for sig in [Signal::SIGTERM, Signal::SIGKILL] {
            match signal::killpg(nix_pid, sig) {
                Ok(()) => {}
                Err(Errno::ESRCH) => return Ok(()),
                Err(e) => return Err(io::Error::other(e)),
            }

            // Poll for exit (up to the grace period)
            let polls = GRACE_PERIOD.as_millis() / 100;
            for _ in 0..polls {
                sleep(Duration::from_millis(100)).await;
                if !pid_exists(pid) {
                    return Ok(());
                }
            }
        }

        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("process {pid} did not exit after SIGKILL"),
        ))
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "killing by PID is not implemented on this platform",
        ))
    }
}

/// Check if a PID exists (without verifying it's our process).
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    // Signal None is the "null signal": existence check only
    match signal::kill(to_nix_pid(pid), None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(_) => true, // Exists but we lack permission
    }
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: u32) -> bool {
    false
}

/// Check that `pid` is an `hq` server for `server_dir`.
///
/// Compares the process command line against the server directory, so a
/// reused PID is never signalled.
///
/// # Platform behavior
/// - **Linux**: reads `/proc/<pid>/cmdline`
/// - **macOS**: uses `sysinfo` to read the process arguments
/// - **Other**: always `false` (conservative)
pub fn is_server_for(pid: u32, server_dir: &Path) -> bool {
    #[cfg(target_os = "linux")]
    {
        is_server_for_linux(pid, server_dir)
    }

    #[cfg(target_os = "macos")]
    {
        is_server_for_macos(pid, server_dir)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = (pid, server_dir);
        false
    }
}

#[cfg(target_os = "linux")]
fn is_server_for_linux(pid: u32, server_dir: &Path) -> bool {
    let Ok(raw) = std::fs::read(format!("/proc/{pid}/cmdline")) else {
        return false;
    };
    let expected = server_dir.as_os_str().as_encoded_bytes();
    raw.split(|b| *b == 0).any(|arg| arg == expected)
}

#[cfg(target_os = "macos")]
fn is_server_for_macos(pid: u32, server_dir: &Path) -> bool {
    use sysinfo::System;

    // Use new_all() to ensure processes are loaded
    let sys = System::new_all();

    let Some(process) = sys.process(sysinfo::Pid::from_u32(pid)) else {
        return false;
    };
    process
        .cmd()
        .iter()
        .any(|arg| arg.as_os_str() == server_dir.as_os_str())
}

#[cfg(unix)]
#[allow(clippy::cast_possible_wrap)]
fn to_nix_pid(pid: u32) -> Pid {
    Pid::from_raw(pid as i32)
}
