//! Obsolescence classification by last-access age.
//!
//! A file is obsolete when `reference_time - last_access` exceeds the
//! threshold STRICTLY; a file exactly at the threshold is not flagged.
//! Whether the filesystem tracks access times faithfully (many mounts
//! use relatime or noatime) is an accuracy caveat the classifier does
//! not try to detect.

use std::time::{Duration, SystemTime};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use binsweep_core::{FileEntry, FileError, Inventory};

/// Default age threshold: 365 days.
pub const DEFAULT_THRESHOLD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Configuration for obsolescence classification.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ObsoleteConfig {
    /// Age beyond which a file becomes a candidate.
    #[builder(default = "DEFAULT_THRESHOLD")]
    pub threshold: Duration,

    /// Reference time for age calculations (default: now).
    #[builder(default = "SystemTime::now()")]
    pub reference_time: SystemTime,

    /// Re-read each file's attributes at classification time instead
    /// of trusting the walk-time snapshot. File state may change
    /// between scan and classify, so this defaults to true.
    #[builder(default = "true")]
    pub refresh_timestamps: bool,
}

impl Default for ObsoleteConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            reference_time: SystemTime::now(),
            refresh_timestamps: true,
        }
    }
}

impl ObsoleteConfig {
    /// Create a new config builder.
    pub fn builder() -> ObsoleteConfigBuilder {
        ObsoleteConfigBuilder::default()
    }
}

/// A file whose age exceeded the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsoleteCandidate {
    /// The affected file.
    pub entry: FileEntry,
    /// Computed age (reference time minus last access).
    pub age: Duration,
}

/// Results of one obsolescence pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsoleteReport {
    /// Files older than the threshold, in discovery order.
    pub candidates: Vec<ObsoleteCandidate>,

    /// Files whose attributes could not be read. Excluded from
    /// candidacy.
    pub errors: Vec<FileError>,

    /// Number of files evaluated.
    pub files_checked: u64,
}

impl ObsoleteReport {
    /// Check if any obsolete files were found.
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Total bytes across all candidates.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.candidates.iter().map(|c| c.entry.size).sum()
    }

    /// Paths of every candidate, in discovery order.
    pub fn candidate_paths(&self) -> Vec<std::path::PathBuf> {
        self.candidates.iter().map(|c| c.entry.path.clone()).collect()
    }
}

/// Classifies inventory files by time since last access.
pub struct ObsoleteClassifier {
    config: ObsoleteConfig,
}

impl ObsoleteClassifier {
    /// Create a new classifier with default config.
    pub fn new() -> Self {
        Self {
            config: ObsoleteConfig::default(),
        }
    }

    /// Create a new classifier with custom config.
    pub fn with_config(config: ObsoleteConfig) -> Self {
        Self { config }
    }

    /// Evaluate every inventory entry against the age threshold.
    ///
    /// Stateless: repeated calls over an unchanged inventory yield the
    /// same candidates for the same reference time.
    pub fn classify(&self, inventory: &Inventory) -> ObsoleteReport {
        let mut candidates: Vec<ObsoleteCandidate> = Vec::new();
        let mut errors: Vec<FileError> = Vec::new();
        let mut files_checked: u64 = 0;

        for entry in inventory {
            files_checked += 1;

            let accessed = match self.last_access(entry) {
                Ok(t) => t,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };

            // A last-access in the future yields no age; not a candidate.
            let age = match self.config.reference_time.duration_since(accessed) {
                Ok(age) => age,
                Err(_) => continue,
            };

            if age > self.config.threshold {
                candidates.push(ObsoleteCandidate {
                    entry: entry.clone(),
                    age,
                });
            }
        }

        debug!(
            checked = files_checked,
            candidates = candidates.len(),
            errors = errors.len(),
            "obsolescence pass finished"
        );

        ObsoleteReport {
            candidates,
            errors,
            files_checked,
        }
    }

    /// Resolve a file's last-access time, either fresh or from the
    /// walk-time snapshot.
    fn last_access(&self, entry: &FileEntry) -> Result<SystemTime, FileError> {
        if self.config.refresh_timestamps {
            let metadata = std::fs::metadata(&entry.path)
                .map_err(|e| FileError::metadata(&entry.path, format!("Error accessing: {e}")))?;
            metadata
                .accessed()
                .map_err(|e| FileError::metadata(&entry.path, format!("Error accessing: {e}")))
        } else {
            entry
                .accessed()
                .ok_or_else(|| FileError::metadata(&entry.path, "Access time unavailable"))
        }
    }
}

impl Default for ObsoleteClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as a human-readable age string.
pub fn format_age(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs} seconds")
    } else if secs < 3600 {
        format!("{} minutes", secs / 60)
    } else if secs < 86400 {
        format!("{} hours", secs / 3600)
    } else if secs < 31536000 {
        format!("{} days", secs / 86400)
    } else {
        format!("{:.1} years", secs as f64 / 31536000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsweep_core::{InventoryStats, ScanConfig, Timestamps};
    use std::path::PathBuf;

    fn entry_accessed(path: &str, accessed: SystemTime) -> FileEntry {
        FileEntry::new(
            path,
            100,
            Timestamps::new(accessed, Some(accessed), None),
        )
    }

    fn inventory_of(entries: Vec<FileEntry>) -> Inventory {
        Inventory::new(
            PathBuf::from("/test"),
            entries,
            ScanConfig::new("/test"),
            InventoryStats::new(),
            Duration::ZERO,
            Vec::new(),
        )
    }

    fn classifier(threshold: Duration, reference: SystemTime) -> ObsoleteClassifier {
        let config = ObsoleteConfig::builder()
            .threshold(threshold)
            .reference_time(reference)
            .refresh_timestamps(false)
            .build()
            .unwrap();
        ObsoleteClassifier::with_config(config)
    }

    #[test]
    fn test_strict_threshold_boundary() {
        let now = SystemTime::now();
        let threshold = Duration::from_secs(1000);

        let at_threshold = entry_accessed("/test/at.txt", now - threshold);
        let just_past = entry_accessed("/test/past.txt", now - threshold - Duration::from_secs(1));

        let report =
            classifier(threshold, now).classify(&inventory_of(vec![at_threshold, just_past]));

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].entry.path, PathBuf::from("/test/past.txt"));
        assert!(report.candidates[0].age > threshold);
    }

    #[test]
    fn test_old_file_flagged_recent_file_not() {
        let now = SystemTime::now();
        let day = Duration::from_secs(24 * 60 * 60);

        let old = entry_accessed("/test/old.dat", now - 400 * day);
        let recent = entry_accessed("/test/recent.dat", now - 10 * day);

        let report = classifier(DEFAULT_THRESHOLD, now).classify(&inventory_of(vec![old, recent]));

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].entry.name, "old.dat");
        assert_eq!(report.files_checked, 2);
    }

    #[test]
    fn test_missing_access_time_is_an_error() {
        let now = SystemTime::now();
        let entry = FileEntry::new("/test/no-atime", 1, Timestamps::with_modified(now));

        let report = classifier(DEFAULT_THRESHOLD, now).classify(&inventory_of(vec![entry]));

        assert!(report.candidates.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_future_access_time_not_flagged() {
        let now = SystemTime::now();
        let entry = entry_accessed("/test/future", now + Duration::from_secs(60));

        let report = classifier(Duration::ZERO, now).classify(&inventory_of(vec![entry]));
        assert!(report.candidates.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_idempotent_for_fixed_reference_time() {
        let now = SystemTime::now();
        let old = entry_accessed("/test/old", now - DEFAULT_THRESHOLD * 2);
        let inv = inventory_of(vec![old]);
        let classifier = classifier(DEFAULT_THRESHOLD, now);

        let first = classifier.classify(&inv);
        let second = classifier.classify(&inv);

        assert_eq!(first.candidate_paths(), second.candidate_paths());
        assert_eq!(first.candidates[0].age, second.candidates[0].age);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::from_secs(30)), "30 seconds");
        assert_eq!(format_age(Duration::from_secs(7200)), "2 hours");
        assert_eq!(format_age(Duration::from_secs(172800)), "2 days");
        assert_eq!(format_age(Duration::from_secs(2 * 31536000)), "2.0 years");
    }
}
