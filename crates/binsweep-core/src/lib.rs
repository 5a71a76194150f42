//! Core types for binsweep.
//!
//! This crate provides the fundamental data structures shared across
//! the binsweep workspace: file entries, the scan inventory, content
//! hashes, configuration, and error/warning types.

mod config;
mod entry;
mod error;
mod inventory;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use entry::{ContentHash, FileEntry, Timestamps};
pub use error::{FileError, FileErrorKind, ScanError, ScanWarning, WarningKind};
pub use inventory::{Inventory, InventoryStats};
