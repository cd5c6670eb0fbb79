use std::sync::Arc;

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};

use crate::core::traits::notifier::SubmissionScanner;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanRequest {
    pub faculty_username: String,
    pub class_name: String,
    pub assignment_name: String,
    pub student_username: String,
}

#[derive(Clone, Debug)]
pub struct ScanQueue {
    tx: UnboundedSender<ScanRequest>,
}

impl ScanQueue {
    pub fn channel() -> (Self, UnboundedReceiver<ScanRequest>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue_submission_scan(&self, request: ScanRequest) {
        if let Err(e) = self.tx.send(request) {
            tracing::warn!(
                "Scan consumer is gone, dropping scan for {}",
                e.0.student_username
            );
        }
    }
}

pub fn spawn_scan_updater(
    mut rx: UnboundedReceiver<ScanRequest>,
    scanner: Arc<dyn SubmissionScanner>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            tracing::debug!("Scanning submissions: {:?}", request);
            if let Err(msg) = scanner.scan(&request).await {
                tracing::error!("Submission scan failed for {:?}: {}", request, msg);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::notifier::MockSubmissionScanner;

    #[tokio::test]
    async fn test_updater_forwards_requests() {
        let (queue, rx) = ScanQueue::channel();
        let mut scanner = MockSubmissionScanner::new();
        scanner
            .expect_scan()
            .withf(|req| req.student_username == "hopperg" && req.assignment_name == "hw1")
            .times(1)
            .returning(|_| Ok(()));

        let handle = spawn_scan_updater(rx, Arc::new(scanner));
        queue.enqueue_submission_scan(ScanRequest {
            faculty_username: "prof".to_string(),
            class_name: "cs1".to_string(),
            assignment_name: "hw1".to_string(),
            student_username: "hopperg".to_string(),
        });
        drop(queue);

        handle.await.unwrap();
    }
}
