use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::errors::LockError;

/// One exclusive, non-reentrant lock per assignment directory.
///
/// Guards the test assets while they are copied and the reports repository
/// while it is written. Never hold a guard across test execution.
#[derive(Debug, Default)]
pub struct DirectoryLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

/// Releases the directory lock when dropped.
#[derive(Debug)]
pub struct DirectoryLockGuard {
    path: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl DirectoryLockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirectoryLockGuard {
    fn drop(&mut self) {
        tracing::trace!("Released lock for {}", self.path.display());
    }
}

impl DirectoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, path: &Path) -> Arc<Mutex<()>> {
        // The map shard lock is released before anyone awaits the mutex.
        self.locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Waits for exclusive access to `path`. Acquiring a lock already held
    /// by the same task never completes.
    pub async fn lock(&self, path: &Path) -> DirectoryLockGuard {
        let mutex = self.entry(path);
        let guard = mutex.lock_owned().await;
        tracing::trace!("Acquired lock for {}", path.display());
        DirectoryLockGuard {
            path: path.to_path_buf(),
            _guard: guard,
        }
    }

    /// Fails instead of waiting, which is how a nested acquisition of the
    /// same path shows up.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn try_lock(&self, path: &Path) -> Result<DirectoryLockGuard, LockError> {
        let mutex = self.entry(path);
        let guard = mutex
            .try_lock_owned()
            .map_err(|_| LockError::AlreadyHeld(path.to_path_buf()))?;
        Ok(DirectoryLockGuard {
            path: path.to_path_buf(),
            _guard: guard,
        })
    }
}
