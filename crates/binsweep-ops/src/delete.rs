//! Synchronous batch deletion.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome of one removal attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Path that was attempted.
    pub path: PathBuf,
    /// Size of the file before removal (0 if it could not be read).
    pub bytes: u64,
    /// Failure reason, or None on success.
    pub error: Option<String>,
}

impl DeleteOutcome {
    /// Check if the removal succeeded.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated results of one deletion batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteReport {
    /// One outcome per attempted path, in input order.
    pub outcomes: Vec<DeleteOutcome>,
    /// Paths never attempted because the batch was cancelled.
    pub skipped: Vec<PathBuf>,
    /// Number of successful removals.
    pub succeeded: usize,
    /// Number of failed removals.
    pub failed: usize,
    /// Bytes freed by successful removals.
    pub bytes_reclaimed: u64,
}

impl DeleteReport {
    /// Record one outcome.
    pub fn record(&mut self, outcome: DeleteOutcome) {
        if outcome.succeeded() {
            self.succeeded += 1;
            self.bytes_reclaimed += outcome.bytes;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Check if every attempted removal succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get a human-readable summary of the batch.
    pub fn summary(&self) -> String {
        if self.failed == 0 && self.skipped.is_empty() {
            format!("Deleted {} files", self.succeeded)
        } else {
            format!(
                "Deleted {} files, {} failed, {} skipped",
                self.succeeded,
                self.failed,
                self.skipped.len()
            )
        }
    }
}

/// Attempt to remove one regular file.
///
/// Directories are refused; this executor only ever deletes files.
pub(crate) fn delete_one(path: &Path) -> DeleteOutcome {
    let bytes = match std::fs::symlink_metadata(path) {
        Ok(m) if m.is_dir() => {
            return DeleteOutcome {
                path: path.to_path_buf(),
                bytes: 0,
                error: Some("is a directory".to_string()),
            };
        }
        Ok(m) => m.len(),
        Err(_) => 0,
    };

    match std::fs::remove_file(path) {
        Ok(()) => DeleteOutcome {
            path: path.to_path_buf(),
            bytes,
            error: None,
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "delete failed");
            DeleteOutcome {
                path: path.to_path_buf(),
                bytes: 0,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Remove each path in order, one attempt per file.
///
/// A failure on one file never prevents attempting the rest.
pub fn delete_files(paths: &[PathBuf]) -> DeleteReport {
    let mut report = DeleteReport::default();

    for path in paths {
        report.record(delete_one(path));
    }

    debug!(
        succeeded = report.succeeded,
        failed = report.failed,
        bytes = report.bytes_reclaimed,
        "delete batch finished"
    );

    report
}
