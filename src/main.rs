use std::panic;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::constants::SUBMISSION_CHANNEL_SIZE;
use crate::core::domain::Submission;
use crate::core::pipeline::running::{Collaborators, SubmissionRunner, handle_running};
use crate::locks::DirectoryLocks;
use crate::native::{command::ProcessRunner, git::GitCli, system::SystemCli};
use crate::notify::email::{EmailQueue, spawn_email_sender};
use crate::notify::scan::{ScanQueue, spawn_scan_updater};
use crate::stubs::{class_state::ClassStateStub, mailer::MailerStub, scanner::ScannerStub};

mod config;
mod constants;
mod core;
mod locks;
mod native;
mod notify;
mod reports;
mod sandbox;
mod stubs;
#[cfg(test)]
mod testing;
mod workspace;

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    set_panic_hook();

    let Some(submission_path) = std::env::args().nth(1) else {
        return Err("usage: submission-runner <submission.yaml>".into());
    };
    let config = Arc::new(Config::load().await?);
    let submission: Submission =
        serde_yaml::from_str(&tokio::fs::read_to_string(&submission_path).await?)?;

    let (emails, email_rx) = EmailQueue::channel();
    let (scans, scan_rx) = ScanQueue::channel();
    let email_sender = spawn_email_sender(email_rx, Arc::new(MailerStub));
    let scan_updater = spawn_scan_updater(scan_rx, Arc::new(ScannerStub));

    let runner = Arc::new(SubmissionRunner::new(
        config,
        Collaborators {
            class_state: Arc::new(ClassStateStub::new(true, false)),
            git: Arc::new(GitCli::new()),
            system: Arc::new(SystemCli::new()),
            commands: Arc::new(ProcessRunner::new()),
        },
        Arc::new(DirectoryLocks::new()),
        emails,
        scans,
    ));

    let (submission_tx, submission_rx) = mpsc::channel(SUBMISSION_CHANNEL_SIZE);
    let running = handle_running(submission_rx, runner.clone());
    tracing::info!("Submitting {}", submission_path);
    submission_tx.send(submission).await?;
    drop(submission_tx);
    running.await?;

    // Closing the last producers lets both consumers drain and stop.
    drop(runner);
    email_sender.await?;
    scan_updater.await?;

    Ok(())
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
