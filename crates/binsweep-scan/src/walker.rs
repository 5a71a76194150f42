//! JWalk-based directory walker.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use binsweep_core::{
    FileEntry, Inventory, InventoryStats, ScanConfig, ScanError, ScanWarning, Timestamps,
    WarningKind,
};

use crate::progress::ScanProgress;

/// How many files between progress broadcasts.
const PROGRESS_INTERVAL: u64 = 64;

/// Walks a directory tree and builds a flat file inventory.
///
/// Entries are sorted per directory so the same tree always yields the
/// same discovery order, which duplicate grouping relies on for its
/// retained-copy tie-break.
pub struct Scanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan the configured root and build an inventory.
    ///
    /// Fails only when the root itself is invalid or inaccessible.
    /// Unreadable subtrees and entries are recorded as warnings.
    pub fn scan(&self, config: &ScanConfig) -> Result<Inventory, ScanError> {
        let cancel = AtomicBool::new(false);
        self.scan_with_cancel(config, &cancel)
    }

    /// Scan with a cooperative cancellation flag.
    ///
    /// The flag is checked between entries; raising it makes the scan
    /// return [`ScanError::Interrupted`].
    pub fn scan_with_cancel(
        &self,
        config: &ScanConfig,
        cancel: &AtomicBool,
    ) -> Result<Inventory, ScanError> {
        let start = Instant::now();
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        debug!(root = %root.display(), "starting scan");

        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(&root)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        let mut entries: Vec<FileEntry> = Vec::new();
        let mut stats = InventoryStats::new();
        let mut warnings: Vec<ScanWarning> = Vec::new();

        for entry_result in walker {
            if cancel.load(Ordering::Relaxed) {
                return Err(ScanError::Interrupted);
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::ReadError));
                    continue;
                }
            };

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();

            if config.should_ignore(&file_name) {
                continue;
            }

            let file_type = entry.file_type();
            let depth = entry.depth() as u32;

            if file_type.is_dir() {
                stats.record_dir(depth);
            } else if file_type.is_symlink() {
                stats.record_symlink();
                if !path.exists() {
                    let target = std::fs::read_link(&path)
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default();
                    warnings.push(ScanWarning::broken_symlink(&path, &target));
                }
            } else if file_type.is_file() {
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(err) => {
                        warnings.push(ScanWarning::new(
                            &path,
                            err.to_string(),
                            WarningKind::MetadataError,
                        ));
                        continue;
                    }
                };

                let size = metadata.len();
                let timestamps = Timestamps::new(
                    metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
                    metadata.accessed().ok(),
                    metadata.created().ok(),
                );

                stats.record_file(path.clone(), size, depth);
                entries.push(FileEntry::new(path.clone(), size, timestamps));

                if stats.total_files % PROGRESS_INTERVAL == 0 {
                    self.emit_progress(&stats, &path, warnings.len() as u64, start);
                }
            }
            // Sockets, devices, and other non-regular entries are skipped.
        }

        if !warnings.is_empty() {
            warn!(count = warnings.len(), "scan completed with warnings");
        }

        let scan_duration = start.elapsed();
        self.emit_progress(&stats, &root, warnings.len() as u64, start);

        debug!(
            files = stats.total_files,
            dirs = stats.total_dirs,
            bytes = stats.total_size,
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan finished"
        );

        Ok(Inventory::new(
            root,
            entries,
            config.clone(),
            stats,
            scan_duration,
            warnings,
        ))
    }

    fn emit_progress(&self, stats: &InventoryStats, current: &Path, warnings: u64, start: Instant) {
        let _ = self.progress_tx.send(ScanProgress {
            files_found: stats.total_files,
            dirs_walked: stats.total_dirs,
            bytes_seen: stats.total_size,
            current_path: current.to_path_buf(),
            warnings_count: warnings,
            elapsed: start.elapsed(),
        });
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let inventory = Scanner::new().scan(&config).unwrap();

        assert_eq!(inventory.len(), 4);
        assert_eq!(inventory.stats.total_dirs, 3);
        assert!(inventory.total_size() > 0);
        assert!(!inventory.has_warnings());
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());
        let scanner = Scanner::new();

        let first: Vec<_> = scanner
            .scan(&config)
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.path)
            .collect();
        let second: Vec<_> = scanner
            .scan(&config)
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.path)
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let config = ScanConfig::new(temp.path().join("does-not-exist"));

        let err = Scanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_scan_root_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "not a directory").unwrap();

        let err = Scanner::new().scan(&ScanConfig::new(&file)).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_ignore_patterns() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["*.txt".to_string()])
            .build()
            .unwrap();

        let inventory = Scanner::new().scan(&config).unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_cancelled_scan_is_interrupted() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let cancel = AtomicBool::new(true);
        let err = Scanner::new()
            .scan_with_cancel(&config, &cancel)
            .unwrap_err();
        assert!(matches!(err, ScanError::Interrupted));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp = create_test_tree();
        let root = temp.path();

        // Link back to an ancestor; following it would recurse forever.
        std::os::unix::fs::symlink(root, root.join("dir1/loop")).unwrap();

        let inventory = Scanner::new().scan(&ScanConfig::new(root)).unwrap();

        assert_eq!(inventory.len(), 4);
        assert_eq!(inventory.stats.total_symlinks, 1);
    }

    #[test]
    fn test_progress_is_broadcast() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for i in 0..(PROGRESS_INTERVAL * 2) {
            fs::write(root.join(format!("f{i:04}.dat")), "x").unwrap();
        }

        let scanner = Scanner::new();
        let mut rx = scanner.subscribe();
        scanner.scan(&ScanConfig::new(root)).unwrap();

        let progress = rx.try_recv().unwrap();
        assert!(progress.files_found >= PROGRESS_INTERVAL);
    }
}
