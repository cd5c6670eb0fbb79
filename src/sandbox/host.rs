use std::path::PathBuf;

use super::{Sandbox, SandboxContext, SandboxPlan, as_tester, script_invocation};

/// Runs the script directly on the host as the execution account.
#[derive(Clone, Debug)]
pub struct HostSandbox;

impl Sandbox for HostSandbox {
    fn run_root(&self, ctx: &SandboxContext<'_>) -> PathBuf {
        ctx.exec_dir.to_path_buf()
    }

    fn plan(&self, ctx: &SandboxContext<'_>) -> SandboxPlan {
        SandboxPlan {
            prepare: Vec::new(),
            run: as_tester(ctx.config).args(script_invocation(&self.run_root(ctx), ctx)),
        }
    }
}
