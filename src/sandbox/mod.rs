//! Builds the outer process or container boundary around `run_action.sh`.
//!
//! Every variant runs the same generated script with the same trailing
//! arguments: the assignment path, then the student's username, email
//! address, last name and first name.

use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    constants::RUN_ACTION_SH,
    core::{domain::Student, domain::TestEnvironment, traits::command::CommandSpec},
};

pub mod container;
pub mod environment;
pub mod host;
pub mod namespace;
pub mod script;

pub use container::ContainerSandbox;
pub use host::HostSandbox;
pub use namespace::NamespaceSandbox;

#[derive(Clone, Copy, Debug)]
pub struct SandboxContext<'a> {
    /// Private execution directory on the host.
    pub exec_dir: &'a Path,
    pub assignment_name: &'a str,
    pub student: &'a Student,
    pub config: &'a Config,
}

/// Commands for one run. `prepare` output is discarded; `run` output is the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SandboxPlan {
    pub prepare: Vec<CommandSpec>,
    pub run: CommandSpec,
}

pub trait Sandbox: std::fmt::Debug + Send + Sync {
    /// The execution directory as the sandboxed script sees it.
    fn run_root(&self, ctx: &SandboxContext<'_>) -> PathBuf;

    fn plan(&self, ctx: &SandboxContext<'_>) -> SandboxPlan;
}

impl TestEnvironment {
    pub fn sandbox(&self) -> Box<dyn Sandbox> {
        match self {
            TestEnvironment::Host => Box::new(HostSandbox),
            TestEnvironment::NamespaceIsolated { append_args } => Box::new(NamespaceSandbox {
                append_args: append_args.clone(),
            }),
            TestEnvironment::Container { image } => Box::new(ContainerSandbox {
                image: image.clone(),
            }),
        }
    }
}

/// `bash <root>/run_action.sh <root>/<assignment> <student...>`
fn script_invocation(root: &Path, ctx: &SandboxContext<'_>) -> Vec<String> {
    vec![
        "bash".to_string(),
        root.join(RUN_ACTION_SH).display().to_string(),
        root.join(ctx.assignment_name).display().to_string(),
        ctx.student.username.clone(),
        ctx.student.email_address.clone(),
        ctx.student.last_name.clone(),
        ctx.student.first_name.clone(),
    ]
}

/// Switches to the execution account before running anything.
fn as_tester(config: &Config) -> CommandSpec {
    CommandSpec::new("sudo").args(["--user", config.tester_user.as_str(), "--set-home"])
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn student() -> Student {
        Student {
            username: "hopperg".to_string(),
            email_address: "hopperg@example.edu".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
        }
    }

    pub fn config() -> Config {
        Config::default().with_tester_home("/home/tester")
    }

    pub const STUDENT_ARGS: [&str; 4] = ["hopperg", "hopperg@example.edu", "Hopper", "Grace"];
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_all_variants_share_trailing_arguments() {
        let student = student();
        let config = config();
        let ctx = SandboxContext {
            exec_dir: Path::new("/home/tester/1700000000_abc"),
            assignment_name: "hw1",
            student: &student,
            config: &config,
        };
        let envs = [
            TestEnvironment::Host,
            TestEnvironment::NamespaceIsolated {
                append_args: Some("--net=none".to_string()),
            },
            TestEnvironment::Container {
                image: "alpine".to_string(),
            },
        ];

        for env in envs {
            let sandbox = env.sandbox();
            let plan = sandbox.plan(&ctx);
            let args = &plan.run.args;
            let root = sandbox.run_root(&ctx);

            assert_eq!(&args[args.len() - 4..], STUDENT_ARGS);
            assert_eq!(args[args.len() - 5], root.join("hw1").display().to_string());
            assert_eq!(
                args[args.len() - 6],
                root.join(RUN_ACTION_SH).display().to_string()
            );
            assert_eq!(args[args.len() - 7], "bash");
        }
    }
}
