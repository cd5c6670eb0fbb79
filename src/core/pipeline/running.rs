use std::{path::Path, sync::Arc};

use tokio::{
    sync::mpsc::Receiver,
    task::{JoinHandle, JoinSet},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::Config,
    constants::TEST_ENV_YAML,
    core::{
        domain::{Precondition, RunOutcome, RunState, Submission},
        errors::InfraError,
        traits::{
            class_state::ClassState, command::CommandRunner, git::Git, system::SystemCommands,
        },
    },
    locks::DirectoryLocks,
    notify::{
        email::{Email, EmailQueue},
        failure::report_failure,
        scan::{ScanQueue, ScanRequest},
    },
    reports::ReportRecorder,
    sandbox::{SandboxContext, environment::load_test_env, script::write_run_action_sh},
    workspace::ExecutionDir,
};

/// External systems a run talks to.
#[derive(Clone, Debug)]
pub struct Collaborators {
    pub class_state: Arc<dyn ClassState>,
    pub git: Arc<dyn Git>,
    pub system: Arc<dyn SystemCommands>,
    pub commands: Arc<dyn CommandRunner>,
}

/// Runs instructor tests against one submission at a time. Shared between
/// concurrent runs; the only shared mutable state is behind `locks`.
#[derive(Clone, Debug)]
pub struct SubmissionRunner {
    config: Arc<Config>,
    collaborators: Collaborators,
    locks: Arc<DirectoryLocks>,
    recorder: ReportRecorder,
    emails: EmailQueue,
    scans: ScanQueue,
}

impl SubmissionRunner {
    pub fn new(
        config: Arc<Config>,
        collaborators: Collaborators,
        locks: Arc<DirectoryLocks>,
        emails: EmailQueue,
        scans: ScanQueue,
    ) -> Self {
        Self {
            recorder: ReportRecorder::new(collaborators.git.clone()),
            config,
            collaborators,
            locks,
            emails,
            scans,
        }
    }

    /// Tests one submission end to end. Never fails: infrastructure errors
    /// are reported by email and the execution directory is always removed.
    pub async fn run_tests(&self, submission: &Submission) -> RunOutcome {
        let span = tracing::info_span!(
            "run_tests",
            run_id = %Uuid::new_v4(),
            student = %submission.student.username,
            class = %submission.class_name(),
            assignment = %submission.assignment_name(),
        );
        self.run(submission).instrument(span).await
    }

    async fn run(&self, submission: &Submission) -> RunOutcome {
        transition(RunState::Created);
        transition(RunState::PreconditionCheck);
        match self.check_preconditions(submission).await {
            Precondition::ClassClosed => {
                self.send_closed_email(submission);
                return RunOutcome::ClassClosed;
            }
            Precondition::AssignmentDisabled => {
                self.send_disabled_email(submission);
                return RunOutcome::AssignmentDisabled;
            }
            Precondition::Ready => {}
        }

        tracing::debug!(
            "Running tests on {}",
            submission.student_repo_path.display()
        );

        let exec_dir = match ExecutionDir::create(
            &self.config.tester_home(),
            self.collaborators.system.clone(),
        )
        .await
        {
            Ok(exec_dir) => exec_dir,
            Err(e) => return self.infra_failed(submission, e),
        };

        let outcome = match self.test_in(submission, exec_dir.path()).await {
            Ok(()) => RunOutcome::Completed,
            Err(e) => self.infra_failed(submission, e),
        };

        exec_dir.remove().await;
        transition(RunState::CleanedUp);
        tracing::debug!(
            "Done running tests on {}",
            submission.student_repo_path.display()
        );
        outcome
    }

    async fn check_preconditions(&self, submission: &Submission) -> Precondition {
        let class_state = &self.collaborators.class_state;
        if !class_state
            .class_is_open(submission.class_name(), &submission.faculty_username)
            .await
        {
            return Precondition::ClassClosed;
        }
        if class_state
            .is_disabled(
                submission.class_name(),
                submission.assignment_name(),
                &submission.faculty_username,
            )
            .await
        {
            return Precondition::AssignmentDisabled;
        }
        Precondition::Ready
    }

    /// Prepares `exec_dir`, runs the sandbox and delivers the results.
    async fn test_in(&self, submission: &Submission, exec_dir: &Path) -> Result<(), InfraError> {
        let Collaborators {
            git,
            system,
            commands,
            ..
        } = &self.collaborators;
        let assignment = &submission.assignment_dir;

        let work_tree = exec_dir.join(submission.assignment_name());
        git.clone_repo(&submission.student_repo_path, &work_tree)
            .await?;
        git.checkout(&work_tree, &submission.commit_hash).await?;

        {
            let guard = self.locks.lock(&assignment.path).await;
            tracing::trace!("Copying tests from {}", guard.path().display());
            system.copy(&assignment.tests_path, exec_dir).await?;
            match tokio::fs::try_exists(&assignment.test_env_path).await {
                Ok(true) => system.copy(&assignment.test_env_path, exec_dir).await?,
                Ok(false) => {}
                Err(e) => tracing::warn!(
                    "Cannot check {}, running on the host: {}",
                    assignment.test_env_path.display(),
                    e
                ),
            }
        }

        let environment = load_test_env(&exec_dir.join(TEST_ENV_YAML)).await?;
        tracing::debug!("Test environment: {:?}", environment);
        let sandbox = environment.sandbox();
        let ctx = SandboxContext {
            exec_dir,
            assignment_name: submission.assignment_name(),
            student: &submission.student,
            config: &self.config,
        };

        write_run_action_sh(exec_dir, Some(&sandbox.run_root(&ctx)), &self.config).await?;
        system
            .chown_recursive(
                exec_dir,
                &self.config.tester_user,
                &self.config.keeper_group,
            )
            .await?;
        transition(RunState::Prepared);

        let plan = sandbox.plan(&ctx);
        for cmd in &plan.prepare {
            let out = commands.run(cmd).await?;
            if !out.success() {
                return Err(InfraError::Prepare {
                    command: cmd.to_string(),
                    output: out.output,
                });
            }
        }

        transition(RunState::Executing);
        tracing::debug!("Executing: {}", plan.run);
        let result = commands.run(&plan.run).await?;
        if !result.success() {
            tracing::info!("Tests exited with status {:?}", result.status);
        }
        let body = result.output;

        transition(RunState::Completed);
        let subject = format!(
            "[{}] {} submission test results",
            submission.class_name(),
            submission.assignment_name()
        );
        self.emails.enqueue(Email::preformatted(
            &submission.student.email_address,
            &subject,
            body.clone(),
        ));

        if !submission.is_from_faculty() {
            {
                let _guard = self.locks.lock(&assignment.path).await;
                self.recorder
                    .add_report(&assignment.reports_repo_path, &submission.student, &body)
                    .await?;
            }
            self.scans.enqueue_submission_scan(ScanRequest {
                faculty_username: submission.faculty_username.clone(),
                class_name: submission.class_name().to_string(),
                assignment_name: submission.assignment_name().to_string(),
                student_username: submission.student.username.clone(),
            });
        }

        Ok(())
    }

    fn infra_failed(&self, submission: &Submission, error: InfraError) -> RunOutcome {
        transition(RunState::InfraFailed);
        let msg = error.to_string();
        report_failure(
            &self.emails,
            submission.assignment_name(),
            &submission.student,
            &submission.faculty_email,
            &msg,
        );
        RunOutcome::InfraFailed { msg }
    }

    fn send_closed_email(&self, submission: &Submission) {
        let subject = format!("[{}] class is closed", submission.class_name());
        self.emails.enqueue(Email::new(
            &submission.student.email_address,
            &subject,
            vec!["You have pushed a submission for a class that is closed."],
        ));
        tracing::info!(
            "{} pushed to {} in {}, which is closed",
            submission.student.username,
            submission.assignment_name(),
            submission.class_name()
        );
    }

    fn send_disabled_email(&self, submission: &Submission) {
        let subject = format!(
            "[{}] assignment {} is disabled",
            submission.class_name(),
            submission.assignment_name()
        );
        let body = format!(
            "You have pushed a submission for assignment {} which is disabled. \
             No tests were run on your submission.",
            submission.assignment_name()
        );
        self.emails.enqueue(Email::new(
            &submission.student.email_address,
            &subject,
            vec![body],
        ));
        tracing::info!(
            "{} pushed to {} in {}, which is disabled",
            submission.student.username,
            submission.assignment_name(),
            submission.class_name()
        );
    }
}

fn transition(state: RunState) {
    tracing::debug!("Run state: {:?}", state);
}

/// Runs every received submission on its own task. The returned handle
/// completes once the channel is closed and all runs have finished.
#[tracing::instrument(skip_all)]
pub fn handle_running(
    mut submission_rx: Receiver<Submission>,
    runner: Arc<SubmissionRunner>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut runs = JoinSet::new();
        while let Some(submission) = submission_rx.recv().await {
            let runner = runner.clone();
            runs.spawn(async move { runner.run_tests(&submission).await });

            while let Some(finished) = runs.try_join_next() {
                log_finished(finished);
            }
        }
        while let Some(finished) = runs.join_next().await {
            log_finished(finished);
        }
    })
}

fn log_finished(finished: Result<RunOutcome, tokio::task::JoinError>) {
    match finished {
        Ok(outcome) => tracing::debug!("Run finished: {:?}", outcome),
        Err(e) => tracing::error!("Run task failed: {}", e),
    }
}
