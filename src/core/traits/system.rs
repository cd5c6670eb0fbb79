use std::path::Path;

use crate::core::errors::InfraError;

/// Filesystem operations that may need to cross account boundaries.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SystemCommands: std::fmt::Debug + Send + Sync {
    /// Copies `src` (recursively when it is a directory) into the directory `dest_dir`.
    async fn copy(&self, src: &Path, dest_dir: &Path) -> Result<(), InfraError>;

    async fn chmod(&self, path: &Path, mode: &str) -> Result<(), InfraError>;

    async fn chown_recursive(&self, path: &Path, user: &str, group: &str)
    -> Result<(), InfraError>;

    /// Removes `path` and everything below it with elevated privileges.
    async fn remove_all(&self, path: &Path) -> Result<(), InfraError>;
}
