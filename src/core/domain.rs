use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Student {
    pub username: String,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    /// Name of the student's directory in a reports repository.
    pub fn last_first_username(&self) -> String {
        format!("{}_{}_{}", self.last_name, self.first_name, self.username)
    }
}

/// Faculty-owned bundle of tests and environment descriptor for one assignment.
#[derive(Clone, Debug, Deserialize)]
pub struct AssignmentDirectory {
    pub path: PathBuf,
    pub class_name: String,
    pub assignment_name: String,
    pub tests_path: PathBuf,
    pub reports_repo_path: PathBuf,
    pub test_env_path: PathBuf,
}

impl AssignmentDirectory {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new<T: AsRef<Path>>(path: T, class_name: &str, assignment_name: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            tests_path: path.join(crate::constants::TESTS_DIR),
            reports_repo_path: path.join("reports.git"),
            test_env_path: path.join(crate::constants::TEST_ENV_YAML),
            class_name: class_name.to_string(),
            assignment_name: assignment_name.to_string(),
            path,
        }
    }
}

/// One push event. Never mutated once built.
#[derive(Clone, Debug, Deserialize)]
pub struct Submission {
    pub student: Student,
    pub student_repo_path: PathBuf,
    pub commit_hash: String,
    pub assignment_dir: AssignmentDirectory,
    pub faculty_username: String,
    pub faculty_email: String,
}

impl Submission {
    pub fn class_name(&self) -> &str {
        &self.assignment_dir.class_name
    }

    pub fn assignment_name(&self) -> &str {
        &self.assignment_dir.assignment_name
    }

    pub fn is_from_faculty(&self) -> bool {
        self.student.username == self.faculty_username
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestEnvironment {
    Host,
    NamespaceIsolated { append_args: Option<String> },
    Container { image: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Precondition {
    Ready,
    ClassClosed,
    AssignmentDisabled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Created,
    PreconditionCheck,
    Prepared,
    Executing,
    Completed,
    InfraFailed,
    CleanedUp,
}

/// Terminal state reached by one submission run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    ClassClosed,
    AssignmentDisabled,
    Completed,
    InfraFailed { msg: String },
}
