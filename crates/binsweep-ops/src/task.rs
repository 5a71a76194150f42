//! Channel-based deletion runner.
//!
//! Runs a deletion batch off the caller's thread, streaming progress
//! snapshots and a final report over an mpsc channel. Removal itself
//! happens on the blocking pool. Cancelling the token stops the batch
//! after the in-flight file; unattempted paths are reported as skipped
//! and left untouched.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::delete::{DeleteReport, delete_one};
use crate::OPERATION_CHANNEL_SIZE;

/// Progress information for an ongoing deletion batch.
#[derive(Debug, Clone)]
pub struct DeleteProgress {
    /// Number of files attempted so far.
    pub files_completed: usize,
    /// Total number of files in the batch.
    pub files_total: usize,
    /// Bytes freed so far.
    pub bytes_reclaimed: u64,
    /// The file currently being removed.
    pub current_file: Option<PathBuf>,
}

impl DeleteProgress {
    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.files_total > 0 {
            (self.files_completed as f64 / self.files_total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Messages emitted by a running deletion batch.
#[derive(Debug)]
pub enum DeleteResult {
    /// Progress update.
    Progress(DeleteProgress),
    /// The batch finished (possibly cancelled partway).
    Complete(DeleteReport),
}

/// Start a deletion batch on a background task.
///
/// Returns a receiver yielding [`DeleteResult::Progress`] updates and
/// a final [`DeleteResult::Complete`].
pub fn start_delete(
    paths: Vec<PathBuf>,
    cancel: CancellationToken,
) -> mpsc::Receiver<DeleteResult> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        let files_total = paths.len();
        let mut report = DeleteReport::default();
        let mut attempted = 0usize;

        for (i, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                report.skipped = paths[i..].to_vec();
                debug!(skipped = report.skipped.len(), "delete batch cancelled");
                break;
            }

            let _ = tx
                .send(DeleteResult::Progress(DeleteProgress {
                    files_completed: attempted,
                    files_total,
                    bytes_reclaimed: report.bytes_reclaimed,
                    current_file: Some(path.clone()),
                }))
                .await;

            let target = path.clone();
            let outcome = match tokio::task::spawn_blocking(move || delete_one(&target)).await {
                Ok(outcome) => outcome,
                Err(join_err) => crate::DeleteOutcome {
                    path: path.clone(),
                    bytes: 0,
                    error: Some(join_err.to_string()),
                },
            };

            report.record(outcome);
            attempted += 1;
        }

        let _ = tx.send(DeleteResult::Complete(report)).await;
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn run_to_completion(mut rx: mpsc::Receiver<DeleteResult>) -> DeleteReport {
        loop {
            match rx.recv().await {
                Some(DeleteResult::Progress(_)) => continue,
                Some(DeleteResult::Complete(report)) => return report,
                None => panic!("channel closed without completion"),
            }
        }
    }

    #[tokio::test]
    async fn test_start_delete_removes_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, "one").unwrap();
        fs::write(&b, "two").unwrap();

        let rx = start_delete(vec![a.clone(), b.clone()], CancellationToken::new());
        let report = run_to_completion(rx).await;

        assert_eq!(report.succeeded, 2);
        assert!(report.skipped.is_empty());
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[tokio::test]
    async fn test_cancelled_batch_skips_remaining() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, "data").unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let rx = start_delete(vec![a.clone()], token);
        let report = run_to_completion(rx).await;

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.skipped, vec![a.clone()]);
        assert!(a.exists());
    }
}
