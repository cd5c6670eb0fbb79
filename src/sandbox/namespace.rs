use std::path::PathBuf;

use super::{Sandbox, SandboxContext, SandboxPlan, as_tester, script_invocation};

/// Runs the script in a firejail private filesystem. Inside the jail the
/// execution directory appears as the execution account's home.
#[derive(Clone, Debug)]
pub struct NamespaceSandbox {
    pub append_args: Option<String>,
}

impl Sandbox for NamespaceSandbox {
    fn run_root(&self, ctx: &SandboxContext<'_>) -> PathBuf {
        ctx.config.tester_home()
    }

    fn plan(&self, ctx: &SandboxContext<'_>) -> SandboxPlan {
        let mut run = as_tester(ctx.config)
            .args(["firejail", "--noprofile", "--quiet"])
            .arg(format!("--private={}", ctx.exec_dir.display()));

        if let Some(append_args) = &self.append_args {
            run = run.args(append_args.split_whitespace());
        }

        SandboxPlan {
            prepare: Vec::new(),
            run: run.args(script_invocation(&self.run_root(ctx), ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_firejail_command_with_extra_args() {
        let student = student();
        let config = config();
        let ctx = SandboxContext {
            exec_dir: Path::new("/home/tester/1700000000_abc"),
            assignment_name: "hw1",
            student: &student,
            config: &config,
        };
        let sandbox = NamespaceSandbox {
            append_args: Some("--net=none   --rlimit-nproc=50".to_string()),
        };

        let plan = sandbox.plan(&ctx);

        assert_eq!(
            plan.run.to_string(),
            "sudo --user tester --set-home firejail --noprofile --quiet \
             --private=/home/tester/1700000000_abc --net=none --rlimit-nproc=50 \
             bash /home/tester/run_action.sh /home/tester/hw1 \
             hopperg hopperg@example.edu Hopper Grace"
        );
    }

    #[test]
    fn test_firejail_command_without_extra_args() {
        let student = student();
        let config = config();
        let ctx = SandboxContext {
            exec_dir: Path::new("/home/tester/1700000000_abc"),
            assignment_name: "hw1",
            student: &student,
            config: &config,
        };

        let plan = NamespaceSandbox { append_args: None }.plan(&ctx);

        let private_idx = plan
            .run
            .args
            .iter()
            .position(|a| a.starts_with("--private="))
            .unwrap();
        assert_eq!(plan.run.args[private_idx + 1], "bash");
    }
}
