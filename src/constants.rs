pub const RUN_ACTION_SH: &str = "run_action.sh";
pub const TEST_ENV_YAML: &str = "test_env.yaml";
pub const TESTS_DIR: &str = "tests";

/// Mount point of the execution directory inside a container.
pub const CONTAINER_MOUNT: &str = "/git-keeper-tester";

/// Action scripts in lookup order, paired with their interpreter.
pub const ACTION_SCRIPTS: &[(&str, &str)] = &[("action.sh", "bash"), ("action.py", "python3")];

pub const CONFIG_ENV_VAR: &str = "SUBMISSION_RUNNER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/submission-runner.yaml";

pub const SUBMISSION_CHANNEL_SIZE: usize = 128;
