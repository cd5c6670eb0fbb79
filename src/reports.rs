use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

use crate::core::{domain::Student, errors::InfraError, traits::git::Git};

/// A scratch clone of a reports repository. The scratch directory is removed
/// when the clone is dropped, whether or not it was pushed.
#[derive(Debug)]
pub struct ReportsClone {
    _scratch: TempDir,
    work_tree: PathBuf,
}

impl ReportsClone {
    pub async fn open(git: &dyn Git, reports_repo: &Path) -> Result<Self, InfraError> {
        let scratch = tempfile::Builder::new().prefix("reports_").tempdir()?;
        let work_tree = scratch.path().join("reports");
        git.clone_repo(reports_repo, &work_tree).await?;
        Ok(Self {
            _scratch: scratch,
            work_tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.work_tree
    }

    /// Publishes committed changes back to the reports repository.
    pub async fn push(self, git: &dyn Git) -> Result<(), InfraError> {
        git.push(&self.work_tree).await
    }
}

/// `YYYY-MM-DD_HH-MM-SS-UTC`. Reports are stamped in UTC so the zone is a
/// name and the file name stays free of `:` and `+`.
pub fn report_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S-UTC").to_string()
}

/// Creates `report-<timestamp>.txt` in `dir`, or the first free
/// `report-<timestamp>-<n>.txt`. Existing files are never touched.
pub async fn write_report_file(
    dir: &Path,
    timestamp: &str,
    body: &str,
) -> Result<PathBuf, InfraError> {
    let mut counter = 0u32;
    loop {
        let file_name = if counter == 0 {
            format!("report-{}.txt", timestamp)
        } else {
            format!("report-{}-{}.txt", timestamp, counter)
        };
        let path = dir.join(file_name);

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(body.as_bytes()).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => counter += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Archives test output into the per-student folder of a reports repository.
#[derive(Debug, Clone)]
pub struct ReportRecorder {
    git: Arc<dyn Git>,
}

impl ReportRecorder {
    pub fn new(git: Arc<dyn Git>) -> Self {
        Self { git }
    }

    /// Commits `body` as a new report for `student`. The caller must hold the
    /// assignment lock. Returns the report's path relative to the repository.
    #[tracing::instrument(skip(self, student, body), fields(student = %student.username))]
    pub async fn add_report(
        &self,
        reports_repo: &Path,
        student: &Student,
        body: &str,
    ) -> Result<PathBuf, InfraError> {
        let clone = ReportsClone::open(self.git.as_ref(), reports_repo).await?;
        let last_first_username = student.last_first_username();

        let student_dir = clone.path().join(&last_first_username);
        tokio::fs::create_dir_all(&student_dir)
            .await
            .map_err(|e| InfraError::Report(e.to_string()))?;

        let report_path =
            write_report_file(&student_dir, &report_timestamp(Utc::now()), body).await?;

        self.git.add_all(clone.path()).await?;
        self.git
            .commit(
                clone.path(),
                &format!("Submission report for {}", last_first_username),
            )
            .await?;

        let relative = report_path
            .strip_prefix(clone.path())
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| report_path.clone());
        clone.push(self.git.as_ref()).await?;

        tracing::debug!("Recorded report {}", relative.display());
        Ok(relative)
    }
}
