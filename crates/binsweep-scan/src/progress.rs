//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Snapshot of scan progress, broadcast periodically during a walk.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Regular files found so far.
    pub files_found: u64,
    /// Directories walked so far.
    pub dirs_walked: u64,
    /// Bytes accounted for so far.
    pub bytes_seen: u64,
    /// Path most recently visited.
    pub current_path: PathBuf,
    /// Warnings recorded so far.
    pub warnings_count: u64,
    /// Time elapsed since the walk started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Files found per second so far, for display.
    pub fn files_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.files_found as f64 / secs
        } else {
            0.0
        }
    }
}
