//! Duplicate file grouping by content hash.
//!
//! Every inventory entry is hashed in full; entries sharing a hash form
//! a group. Groups of one are dropped. Within a group, members keep
//! their traversal discovery order and the first-discovered member is
//! the retained copy - the one never proposed for deletion. Given the
//! same traversal order, the retained copy is therefore the same across
//! runs.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use derive_builder::Builder;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use binsweep_core::{ContentHash, FileEntry, FileError, Inventory};

use crate::hash::hash_file;

/// Raised when a cancellation flag interrupts an analysis mid-run.
#[derive(Debug, Error)]
#[error("duplicate analysis cancelled")]
pub struct Cancelled;

/// Configuration for duplicate grouping.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Name/path substrings to exclude from grouping.
    #[builder(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// A group of files sharing identical content.
///
/// Invariant: at least two members, all with the same hash, ordered by
/// discovery index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content hash shared by all members.
    pub hash: ContentHash,

    /// Size of each member in bytes.
    pub size: u64,

    /// Members in discovery order.
    pub members: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// The member that is never proposed for deletion.
    pub fn retained(&self) -> &FileEntry {
        // Groups are only constructed with >= 2 members.
        &self.members[0]
    }

    /// All members except the retained copy.
    pub fn deletion_candidates(&self) -> &[FileEntry] {
        &self.members[1..]
    }

    /// Bytes reclaimable by deleting everything but the retained copy.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.members.len() as u64 - 1)
    }
}

/// Results of one duplicate analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Duplicate groups, ordered by the discovery index of each
    /// group's first member.
    pub groups: Vec<DuplicateGroup>,

    /// Files that could not be hashed. These appear in no group.
    pub errors: Vec<FileError>,

    /// Number of files hashed successfully.
    pub files_hashed: u64,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Number of duplicate groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of files across all groups.
    pub fn duplicate_file_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// Total bytes reclaimable across all groups.
    pub fn total_wasted_bytes(&self) -> u64 {
        self.groups.iter().map(|g| g.wasted_bytes()).sum()
    }

    /// Paths of every deletion candidate, in group order.
    ///
    /// Retained copies and files that failed to hash are never in
    /// this list.
    pub fn deletion_candidates(&self) -> Vec<PathBuf> {
        self.groups
            .iter()
            .flat_map(|g| g.deletion_candidates().iter().map(|e| e.path.clone()))
            .collect()
    }
}

/// Duplicate file finder.
pub struct DuplicateFinder {
    config: DuplicateConfig,
}

impl DuplicateFinder {
    /// Create a new finder with default config.
    pub fn new() -> Self {
        Self {
            config: DuplicateConfig::default(),
        }
    }

    /// Create a new finder with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Group the inventory's files by content hash.
    ///
    /// Recomputes every hash on every call; nothing is cached across
    /// invocations.
    pub fn find_duplicates(&self, inventory: &Inventory) -> DuplicateReport {
        let cancel = AtomicBool::new(false);
        // The flag is never raised, so this cannot fail.
        self.find_duplicates_with_cancel(inventory, &cancel)
            .unwrap_or(DuplicateReport {
                groups: Vec::new(),
                errors: Vec::new(),
                files_hashed: 0,
            })
    }

    /// Group by content hash, checking a cancellation flag between
    /// files.
    pub fn find_duplicates_with_cancel(
        &self,
        inventory: &Inventory,
        cancel: &AtomicBool,
    ) -> Result<DuplicateReport, Cancelled> {
        let candidates: Vec<&FileEntry> = inventory
            .iter()
            .filter(|e| !self.is_excluded(e))
            .collect();

        debug!(files = candidates.len(), "hashing inventory");

        // Parallel hashing; rayon preserves input order in the output,
        // so results stay aligned with discovery order.
        let hashed: Vec<Result<ContentHash, std::io::Error>> = candidates
            .par_iter()
            .map(|entry| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(std::io::Error::other("cancelled"));
                }
                hash_file(&entry.path)
            })
            .collect();

        if cancel.load(Ordering::Relaxed) {
            return Err(Cancelled);
        }

        // Group by hash; IndexMap keeps first-seen group order so the
        // report is deterministic regardless of hash completion order.
        let mut by_hash: IndexMap<ContentHash, Vec<&FileEntry>> = IndexMap::new();
        let mut errors: Vec<FileError> = Vec::new();
        let mut files_hashed: u64 = 0;

        for (entry, result) in candidates.iter().copied().zip(hashed) {
            match result {
                Ok(hash) => {
                    files_hashed += 1;
                    by_hash.entry(hash).or_default().push(entry);
                }
                Err(err) => errors.push(FileError::read(&entry.path, &err)),
            }
        }

        let groups: Vec<DuplicateGroup> = by_hash
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .map(|(hash, members)| DuplicateGroup {
                hash,
                size: members[0].size,
                members: members.into_iter().cloned().collect(),
            })
            .collect();

        debug!(
            groups = groups.len(),
            errors = errors.len(),
            "duplicate grouping finished"
        );

        Ok(DuplicateReport {
            groups,
            errors,
            files_hashed,
        })
    }

    fn is_excluded(&self, entry: &FileEntry) -> bool {
        let path = entry.path.to_string_lossy();
        self.config
            .exclude_patterns
            .iter()
            .any(|p| entry.name.contains(p.as_str()) || path.contains(p.as_str()))
    }
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self::new()
    }
}
