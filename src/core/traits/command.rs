use std::fmt;

use itertools::Itertools;

use crate::core::errors::InfraError;

/// A program invocation, not yet spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", std::iter::once(&self.program).chain(&self.args).join(" "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: Option<i32>,
    /// Standard output and standard error, interleaved.
    pub output: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait CommandRunner: std::fmt::Debug + Send + Sync {
    /// Runs the command to completion. Only a failure to launch or wait on
    /// the process is an error; the exit status is reported, not judged.
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput, InfraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let cmd = CommandSpec::new("docker").arg("pull").args(["-q", "alpine"]);

        assert_eq!(cmd.to_string(), "docker pull -q alpine");
    }
}
