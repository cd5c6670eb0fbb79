use std::path::Path;

use tokio::process::Command;

use crate::core::{errors::InfraError, traits::git::Git};

/// Shells out to the `git` binary.
#[derive(Clone, Debug)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    async fn git(&self, work_tree: Option<&Path>, args: &[&str]) -> Result<String, InfraError> {
        let mut cmd = Command::new(&self.program);
        if let Some(work_tree) = work_tree {
            cmd.arg("-C").arg(work_tree);
        }
        let out = cmd
            .args(args)
            .output()
            .await
            .map_err(|e| InfraError::Git(format!("failed to run git: {}", e)))?;

        if !out.status.success() {
            return Err(InfraError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }
}

fn path_arg(path: &Path) -> Result<&str, InfraError> {
    path.to_str()
        .ok_or_else(|| InfraError::Git(format!("non UTF-8 path {}", path.display())))
}

#[async_trait::async_trait]
impl Git for GitCli {
    async fn clone_repo(&self, repo: &Path, dest: &Path) -> Result<(), InfraError> {
        self.git(None, &["clone", path_arg(repo)?, path_arg(dest)?])
            .await
            .map(|_| ())
    }

    async fn checkout(&self, work_tree: &Path, commit: &str) -> Result<(), InfraError> {
        self.git(Some(work_tree), &["checkout", commit])
            .await
            .map(|_| ())
    }

    async fn add_all(&self, work_tree: &Path) -> Result<(), InfraError> {
        self.git(Some(work_tree), &["add", "--all"]).await.map(|_| ())
    }

    async fn commit(&self, work_tree: &Path, message: &str) -> Result<(), InfraError> {
        self.git(Some(work_tree), &["commit", "-m", message])
            .await
            .map(|_| ())
    }

    async fn push(&self, work_tree: &Path) -> Result<(), InfraError> {
        self.git(Some(work_tree), &["push"]).await.map(|_| ())
    }
}
