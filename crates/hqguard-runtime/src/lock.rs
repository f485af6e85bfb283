//! Advisory launch lock on the server directory.

use std::path::Path;

use hqguard_core::{LaunchLock, ProcessError};

/// Block (off the async runtime) until an exclusive `flock` on `path` is held.
///
/// The lock file is created if missing and never removed; its presence means
/// nothing, only the kernel lock does.
#[cfg(unix)]
pub async fn acquire(path: &Path) -> Result<LaunchLock, ProcessError> {
    use nix::fcntl::{Flock, FlockArg};
    use std::fs::OpenOptions;
    use tracing::debug;

    let owned = path.to_path_buf();
    let join = tokio::task::spawn_blocking(move || -> Result<LaunchLock, ProcessError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&owned)?;

        match Flock::lock(file, FlockArg::LockExclusive) {
            Ok(lock) => {
                debug!("Holding launch lock {}", owned.display());
                Ok(LaunchLock::holding(lock))
            }
            Err((_, errno)) => Err(ProcessError::LockFailed {
                path: owned,
                reason: errno.to_string(),
            }),
        }
    })
    .await;

    join.map_err(|e| ProcessError::LockFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?
}

#[cfg(not(unix))]
pub async fn acquire(_path: &Path) -> Result<LaunchLock, ProcessError> {
    Ok(LaunchLock::noop())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    #[tokio::test]
    async fn second_lock_waits_for_first() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hqguard.lock");

        let first = acquire(&path).await.unwrap();
        assert!(!first.is_noop());

        let blocked = timeout(Duration::from_millis(200), acquire(&path)).await;
        assert!(blocked.is_err(), "second lock should block while first is held");

        drop(first);
        let second = timeout(Duration::from_secs(5), acquire(&path)).await;
        assert!(matches!(second, Ok(Ok(_))));
    }
}
