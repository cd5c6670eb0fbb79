use std::process::Stdio;

use tokio::{
    io::{self, AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    sync::Mutex,
};

use crate::core::{
    errors::InfraError,
    traits::command::{CommandOutput, CommandRunner, CommandSpec},
};

/// Spawns real processes. Standard output and standard error are merged
/// line by line in the order they arrive.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

async fn pump<R: AsyncRead + Unpin>(stream: Option<R>, combined: &Mutex<Vec<u8>>) -> io::Result<()> {
    let Some(stream) = stream else {
        return Ok(());
    };
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line).await? > 0 {
        combined.lock().await.extend_from_slice(&line);
        line.clear();
    }
    Ok(())
}

#[async_trait::async_trait]
impl CommandRunner for ProcessRunner {
    #[tracing::instrument(skip(self), fields(cmd = %cmd))]
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput, InfraError> {
        let launch_err = |msg: String| InfraError::Launch {
            program: cmd.program.clone(),
            msg,
        };

        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| launch_err(e.to_string()))?;

        let combined = Mutex::new(Vec::new());
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (out_res, err_res, status) = tokio::join!(
            pump(stdout, &combined),
            pump(stderr, &combined),
            child.wait()
        );
        out_res.map_err(|e| launch_err(e.to_string()))?;
        err_res.map_err(|e| launch_err(e.to_string()))?;
        let status = status.map_err(|e| launch_err(e.to_string()))?;

        tracing::debug!("Command exited with {}", status);
        let output = combined.into_inner();
        Ok(CommandOutput {
            status: status.code(),
            output: String::from_utf8_lossy(&output).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_combined_output() {
        let cmd = CommandSpec::new("sh").args(["-c", "echo out; sleep 0.1; echo err 1>&2; exit 3"]);

        let out = ProcessRunner::new().run(&cmd).await.unwrap();

        assert_eq!(out.status, Some(3));
        assert!(!out.success());
        assert_eq!(out.output, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let cmd = CommandSpec::new("/nonexistent/program");

        let result = ProcessRunner::new().run(&cmd).await;

        assert!(matches!(result, Err(InfraError::Launch { .. })));
    }
}
