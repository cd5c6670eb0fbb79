//! In-process fakes for tests that need real file effects.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use crate::core::{
    errors::InfraError,
    traits::{
        command::{CommandOutput, CommandRunner, CommandSpec},
        git::Git,
        system::SystemCommands,
    },
};

pub fn copy_dir_all(src: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

/// Treats repositories as plain directories.
#[derive(Debug, Default)]
pub struct LocalGit {
    origins: Mutex<HashMap<PathBuf, PathBuf>>,
    commits: Mutex<Vec<String>>,
    checkouts: Mutex<Vec<String>>,
}

impl LocalGit {
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().unwrap().clone()
    }

    pub fn checkouts(&self) -> Vec<String> {
        self.checkouts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Git for LocalGit {
    async fn clone_repo(&self, repo: &Path, dest: &Path) -> Result<(), InfraError> {
        copy_dir_all(repo, dest).map_err(|e| InfraError::Git(e.to_string()))?;
        self.origins
            .lock()
            .unwrap()
            .insert(dest.to_path_buf(), repo.to_path_buf());
        Ok(())
    }

    async fn checkout(&self, _work_tree: &Path, commit: &str) -> Result<(), InfraError> {
        self.checkouts.lock().unwrap().push(commit.to_string());
        Ok(())
    }

    async fn add_all(&self, _work_tree: &Path) -> Result<(), InfraError> {
        Ok(())
    }

    async fn commit(&self, _work_tree: &Path, message: &str) -> Result<(), InfraError> {
        self.commits.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn push(&self, work_tree: &Path) -> Result<(), InfraError> {
        let origin = self
            .origins
            .lock()
            .unwrap()
            .get(work_tree)
            .cloned()
            .ok_or_else(|| InfraError::Git("no origin".to_string()))?;
        copy_dir_all(work_tree, &origin).map_err(|e| InfraError::Git(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    CopyStart(PathBuf),
    CopyEnd(PathBuf),
    RunStart(String),
    RunEnd(String),
}

/// Local filesystem without privilege changes. Copies can be slowed down to
/// widen race windows.
#[derive(Debug, Default)]
pub struct LocalSystem {
    pub copy_delay: Duration,
    events: Mutex<Vec<Event>>,
    owners: Mutex<Vec<(PathBuf, String)>>,
}

impl LocalSystem {
    pub fn with_copy_delay(copy_delay: Duration) -> Self {
        Self {
            copy_delay,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn owners(&self) -> Vec<(PathBuf, String)> {
        self.owners.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SystemCommands for LocalSystem {
    async fn copy(&self, src: &Path, dest_dir: &Path) -> Result<(), InfraError> {
        self.events
            .lock()
            .unwrap()
            .push(Event::CopyStart(dest_dir.to_path_buf()));
        tokio::time::sleep(self.copy_delay).await;

        let file_name = src
            .file_name()
            .ok_or_else(|| InfraError::Filesystem(format!("bad source {}", src.display())))?;
        let target = dest_dir.join(file_name);
        if src.is_dir() {
            copy_dir_all(src, &target)?;
        } else {
            std::fs::copy(src, target)?;
        }

        self.events
            .lock()
            .unwrap()
            .push(Event::CopyEnd(dest_dir.to_path_buf()));
        Ok(())
    }

    async fn chmod(&self, _path: &Path, _mode: &str) -> Result<(), InfraError> {
        Ok(())
    }

    async fn chown_recursive(
        &self,
        path: &Path,
        user: &str,
        group: &str,
    ) -> Result<(), InfraError> {
        self.owners
            .lock()
            .unwrap()
            .push((path.to_path_buf(), format!("{}:{}", user, group)));
        Ok(())
    }

    async fn remove_all(&self, path: &Path) -> Result<(), InfraError> {
        tokio::fs::remove_dir_all(path).await?;
        Ok(())
    }
}

/// Pretends to run commands, answering with a fixed output after a delay.
#[derive(Debug)]
pub struct RecordingRunner {
    pub output: String,
    pub delay: Duration,
    commands: Mutex<Vec<CommandSpec>>,
    events: Mutex<Vec<Event>>,
}

impl RecordingRunner {
    pub fn new(output: &str, delay: Duration) -> Self {
        Self {
            output: output.to_string(),
            delay,
            commands: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput, InfraError> {
        let id = cmd.to_string();
        self.commands.lock().unwrap().push(cmd.clone());
        self.events.lock().unwrap().push(Event::RunStart(id.clone()));
        tokio::time::sleep(self.delay).await;
        self.events.lock().unwrap().push(Event::RunEnd(id));
        Ok(CommandOutput {
            status: Some(0),
            output: self.output.clone(),
        })
    }
}
