use std::path::Path;

use tokio::process::Command;

use crate::core::{errors::InfraError, traits::system::SystemCommands};

/// Runs coreutils, through `sudo` where the service's own account lacks
/// rights over the execution account's files.
#[derive(Clone, Debug, Default)]
pub struct SystemCli;

impl SystemCli {
    pub fn new() -> Self {
        Self
    }
}

async fn run(program: &str, args: &[&str]) -> Result<(), InfraError> {
    let out = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| InfraError::Filesystem(format!("failed to run {}: {}", program, e)))?;

    if !out.status.success() {
        return Err(InfraError::Filesystem(format!(
            "{} {} failed: {}",
            program,
            args.join(" "),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

fn path_arg(path: &Path) -> Result<&str, InfraError> {
    path.to_str()
        .ok_or_else(|| InfraError::Filesystem(format!("non UTF-8 path {}", path.display())))
}

#[async_trait::async_trait]
impl SystemCommands for SystemCli {
    async fn copy(&self, src: &Path, dest_dir: &Path) -> Result<(), InfraError> {
        run("cp", &["-r", path_arg(src)?, path_arg(dest_dir)?]).await
    }

    async fn chmod(&self, path: &Path, mode: &str) -> Result<(), InfraError> {
        run("chmod", &[mode, path_arg(path)?]).await
    }

    async fn chown_recursive(
        &self,
        path: &Path,
        user: &str,
        group: &str,
    ) -> Result<(), InfraError> {
        let owner = format!("{}:{}", user, group);
        run("sudo", &["chown", "-R", &owner, path_arg(path)?]).await
    }

    async fn remove_all(&self, path: &Path) -> Result<(), InfraError> {
        run("sudo", &["rm", "-rf", path_arg(path)?]).await
    }
}
