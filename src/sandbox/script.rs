use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    constants::{ACTION_SCRIPTS, RUN_ACTION_SH, TESTS_DIR},
    core::errors::InfraError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionScript {
    pub script_name: String,
    pub interpreter: String,
}

/// First known action script present in `tests_dir`.
pub async fn find_action_script(tests_dir: &Path) -> Result<ActionScript, InfraError> {
    for (script_name, interpreter) in ACTION_SCRIPTS {
        if tokio::fs::try_exists(tests_dir.join(script_name))
            .await
            .unwrap_or(false)
        {
            return Ok(ActionScript {
                script_name: script_name.to_string(),
                interpreter: interpreter.to_string(),
            });
        }
    }
    Err(InfraError::NoActionScript(tests_dir.to_path_buf()))
}

/// Renders the entrypoint every sandbox runs. `run_root` is the execution
/// directory as seen from inside the sandbox; when set the script starts in
/// its tests folder.
pub fn render_run_action_sh(
    run_root: Option<&Path>,
    timeout_secs: u64,
    memory_limit_mb: u64,
    action: &ActionScript,
) -> String {
    let cd_command = match run_root {
        Some(root) => format!("cd {}", root.join(TESTS_DIR).display()),
        None => String::new(),
    };

    format!(
        r#"#!/bin/bash
{cd_command}
GLOBAL_TIMEOUT={timeout_secs}
GLOBAL_MEM_LIMIT_MB={memory_limit_mb}
GLOBAL_MEM_LIMIT_KB=$(($GLOBAL_MEM_LIMIT_MB * 1024))
ulimit -v $GLOBAL_MEM_LIMIT_KB
trap 'kill -INT -$pid' INT
timeout $GLOBAL_TIMEOUT {interpreter} {script_name} "$@" &
pid=$!
wait $pid
"#,
        interpreter = action.interpreter,
        script_name = action.script_name,
    )
}

/// Writes `run_action.sh` into `exec_dir`, resolving the action script from
/// the copied tests. Nothing is written when no action script exists.
#[tracing::instrument(skip(config))]
pub async fn write_run_action_sh(
    exec_dir: &Path,
    run_root: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, InfraError> {
    let action = find_action_script(&exec_dir.join(TESTS_DIR)).await?;
    let contents = render_run_action_sh(
        run_root,
        config.tests_timeout,
        config.tests_memory_limit,
        &action,
    );

    let path = exec_dir.join(RUN_ACTION_SH);
    tokio::fs::write(&path, contents).await?;
    tracing::debug!("Wrote {} using {:?}", path.display(), action);
    Ok(path)
}
