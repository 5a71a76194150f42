//! Scan inventory container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::entry::FileEntry;
use crate::error::ScanWarning;

/// Summary statistics for one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryStats {
    /// Total size of all files in bytes.
    pub total_size: u64,
    /// Total number of regular files.
    pub total_files: u64,
    /// Total number of directories.
    pub total_dirs: u64,
    /// Total number of symbolic links seen (not descended into).
    pub total_symlinks: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
    /// Largest file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
}

impl InventoryStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, path: PathBuf, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);

        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((path, size));
        }
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self) {
        self.total_symlinks += 1;
    }
}

/// The complete inventory produced by one scan.
///
/// Entries are in traversal discovery order; the position of an entry
/// is its discovery index, which later analysis uses as the stable
/// tie-break when ordering duplicate groups. The inventory is immutable
/// after the scan and replaced wholesale by the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Root path that was scanned (canonicalized).
    pub root: PathBuf,

    /// All regular files, in discovery order.
    pub entries: Vec<FileEntry>,

    /// When this scan was performed.
    pub scanned_at: DateTime<Utc>,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: InventoryStats,

    /// Non-fatal warnings encountered during the scan.
    pub warnings: Vec<ScanWarning>,
}

impl Inventory {
    /// Create a new inventory.
    pub fn new(
        root: PathBuf,
        entries: Vec<FileEntry>,
        config: ScanConfig,
        stats: InventoryStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            entries,
            scanned_at: Utc::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Number of files in the inventory.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Total size of all files.
    pub fn total_size(&self) -> u64 {
        self.stats.total_size
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Timestamps;

    fn entry(path: &str, size: u64) -> FileEntry {
        FileEntry::new(path, size, Timestamps::with_modified(SystemTime::now()))
    }

    #[test]
    fn test_stats_record_file() {
        let mut stats = InventoryStats::new();
        stats.record_file(PathBuf::from("/test/a.txt"), 1024, 2);
        stats.record_file(PathBuf::from("/test/b.txt"), 4096, 1);

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_size, 5120);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(
            stats.largest_file,
            Some((PathBuf::from("/test/b.txt"), 4096))
        );
    }

    #[test]
    fn test_inventory_order_is_preserved() {
        let entries = vec![entry("/r/b.txt", 1), entry("/r/a.txt", 2)];
        let inv = Inventory::new(
            PathBuf::from("/r"),
            entries,
            ScanConfig::new("/r"),
            InventoryStats::new(),
            Duration::ZERO,
            Vec::new(),
        );

        assert_eq!(inv.len(), 2);
        let names: Vec<_> = inv.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);
    }
}
