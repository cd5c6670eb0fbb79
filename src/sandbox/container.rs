use std::path::PathBuf;

use crate::{constants::CONTAINER_MOUNT, core::traits::command::CommandSpec};

use super::{Sandbox, SandboxContext, SandboxPlan, script_invocation};

/// Runs the script in a docker container with the execution directory
/// mounted at a fixed path.
#[derive(Clone, Debug)]
pub struct ContainerSandbox {
    pub image: String,
}

impl Sandbox for ContainerSandbox {
    /// The mount point, so the script starts in the mounted tests folder
    /// whatever the image's working directory is.
    fn run_root(&self, _ctx: &SandboxContext<'_>) -> PathBuf {
        PathBuf::from(CONTAINER_MOUNT)
    }

    fn plan(&self, ctx: &SandboxContext<'_>) -> SandboxPlan {
        // Pulled up front so pull progress stays out of the report.
        let pull = CommandSpec::new("docker").args(["pull", self.image.as_str()]);

        let run = CommandSpec::new("docker")
            .args([
                "run".to_string(),
                "-v".to_string(),
                format!("{}:{}", ctx.exec_dir.display(), CONTAINER_MOUNT),
                self.image.clone(),
            ])
            .args(script_invocation(&self.run_root(ctx), ctx));

        SandboxPlan {
            prepare: vec![pull],
            run,
        }
    }
}
