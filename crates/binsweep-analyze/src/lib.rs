//! Analysis engine for binsweep.
//!
//! Operates over a scanned [`Inventory`](binsweep_core::Inventory) and
//! identifies two categories of reclaimable files:
//!
//! - **Duplicates** - files with identical content, grouped by full
//!   BLAKE3 hash. The first-discovered member of each group is the
//!   retained copy; the rest are deletion candidates.
//! - **Obsolete files** - files whose last access is strictly older
//!   than a configurable threshold (365 days by default).
//!
//! Both analyses recompute from scratch on every call and never mutate
//! the inventory. Per-file failures (unreadable content, missing
//! attributes) are reported as [`FileError`](binsweep_core::FileError)
//! records; an affected file is excluded from results and never becomes
//! a deletion candidate.
//!
//! ```rust,ignore
//! use binsweep_analyze::{DuplicateFinder, ObsoleteClassifier};
//! use binsweep_scan::{Scanner, ScanConfig};
//!
//! let inventory = Scanner::new().scan(&ScanConfig::new("/path"))?;
//!
//! let report = DuplicateFinder::new().find_duplicates(&inventory);
//! println!("{} duplicate groups", report.group_count());
//!
//! let report = ObsoleteClassifier::new().classify(&inventory);
//! println!("{} obsolete files", report.candidates.len());
//! ```

mod duplicates;
mod hash;
mod obsolete;

pub use duplicates::{
    Cancelled, DuplicateConfig, DuplicateConfigBuilder, DuplicateFinder, DuplicateGroup,
    DuplicateReport,
};
pub use hash::hash_file;
pub use obsolete::{
    ObsoleteCandidate, ObsoleteClassifier, ObsoleteConfig, ObsoleteConfigBuilder, ObsoleteReport,
    format_age,
};

// Re-export core types
pub use binsweep_core::{ContentHash, FileEntry, FileError, Inventory};
