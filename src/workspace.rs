use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::core::{errors::InfraError, traits::system::SystemCommands};

/// Private, time-prefixed directory one run executes in.
///
/// Release it with [`ExecutionDir::remove`], which goes through the
/// privileged remover because the contents end up owned by the execution
/// account. Dropping it unreleased falls back to a best-effort local removal.
#[derive(Debug)]
pub struct ExecutionDir {
    path: PathBuf,
    system: Arc<dyn SystemCommands>,
    removed: bool,
}

impl ExecutionDir {
    pub async fn create(
        parent: &Path,
        system: Arc<dyn SystemCommands>,
    ) -> Result<Self, InfraError> {
        let prefix = format!("{}_", chrono::Utc::now().timestamp());
        let path = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(parent)?
            .keep();

        let dir = Self {
            path,
            system,
            removed: false,
        };
        let chmod = dir.system.chmod(&dir.path, "770").await;
        if let Err(e) = chmod {
            dir.remove().await;
            return Err(e);
        }

        tracing::debug!("Created execution directory {}", dir.path.display());
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory. Failures are logged, never returned.
    pub async fn remove(mut self) {
        match self.system.remove_all(&self.path).await {
            Ok(()) => tracing::debug!("Removed execution directory {}", self.path.display()),
            Err(e) => tracing::warn!(
                "Failed to remove execution directory {}: {}",
                self.path.display(),
                e
            ),
        }
        self.removed = true;
    }
}

impl Drop for ExecutionDir {
    fn drop(&mut self) {
        if !self.removed && self.path.exists() {
            tracing::warn!("Execution directory {} dropped unreleased", self.path.display());
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
