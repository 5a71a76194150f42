//! Directory tree walker for binsweep.
//!
//! Produces a flat [`Inventory`](binsweep_core::Inventory) of every
//! regular file under a root directory, in deterministic discovery
//! order. Unreadable subtrees are recorded as warnings and skipped
//! rather than failing the whole walk.
//!
//! ```rust,ignore
//! use binsweep_core::ScanConfig;
//! use binsweep_scan::Scanner;
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let inventory = Scanner::new().scan(&config)?;
//! println!("{} files, {} bytes", inventory.len(), inventory.total_size());
//! ```

mod progress;
mod walker;

pub use progress::ScanProgress;
pub use walker::Scanner;

// Re-export core types callers need alongside the scanner.
pub use binsweep_core::{Inventory, ScanConfig, ScanError};
