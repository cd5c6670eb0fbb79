use std::path::PathBuf;

use thiserror::Error;

/// Anything that abandons a run after the preconditions passed. The display
/// text is what the faculty owner receives in the failure email.
#[derive(Error, Debug, Clone)]
pub enum InfraError {
    #[error("git error: {0}")]
    Git(String),
    #[error("filesystem error: {0}")]
    Filesystem(String),
    #[error("test environment error: {0}")]
    Environment(String),
    #[error("No valid action script found in {}", .0.display())]
    NoActionScript(PathBuf),
    #[error("failed to launch {program}: {msg}")]
    Launch { program: String, msg: String },
    #[error("`{command}` failed: {output}")]
    Prepare { command: String, output: String },
    #[error("failed to record report: {0}")]
    Report(String),
}

impl From<std::io::Error> for InfraError {
    fn from(err: std::io::Error) -> Self {
        InfraError::Filesystem(err.to_string())
    }
}

#[cfg_attr(not(test), allow(dead_code))]
#[derive(Error, Debug)]
pub enum LockError {
    #[error("lock for {} is already held", .0.display())]
    AlreadyHeld(PathBuf),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
