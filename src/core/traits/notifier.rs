use crate::notify::{email::Email, scan::ScanRequest};

/// Delivers one email. Implementations own retries and durability.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Mailer: std::fmt::Debug + Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), String>;
}

/// Refreshes the faculty-facing view of a student's submissions.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SubmissionScanner: std::fmt::Debug + Send + Sync {
    async fn scan(&self, request: &ScanRequest) -> Result<(), String>;
}
