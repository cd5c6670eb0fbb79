use crate::{core::traits::notifier::SubmissionScanner, notify::scan::ScanRequest};

#[derive(Debug, Clone, Default)]
pub struct ScannerStub;

#[async_trait::async_trait]
impl SubmissionScanner for ScannerStub {
    #[tracing::instrument]
    async fn scan(&self, request: &ScanRequest) -> Result<(), String> {
        tracing::info!("Submission scan requested");
        Ok(())
    }
}
