use std::path::Path;

use crate::core::errors::InfraError;

#[mockall::automock]
#[async_trait::async_trait]
pub trait Git: std::fmt::Debug + Send + Sync {
    /// Clones `repo` into `dest`, which must not exist yet.
    async fn clone_repo(&self, repo: &Path, dest: &Path) -> Result<(), InfraError>;

    async fn checkout(&self, work_tree: &Path, commit: &str) -> Result<(), InfraError>;

    async fn add_all(&self, work_tree: &Path) -> Result<(), InfraError>;

    async fn commit(&self, work_tree: &Path, message: &str) -> Result<(), InfraError>;

    async fn push(&self, work_tree: &Path) -> Result<(), InfraError>;
}
