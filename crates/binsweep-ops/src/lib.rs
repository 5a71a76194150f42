//! Deletion executor for binsweep.
//!
//! Removes deletion candidates one at a time, recording a per-file
//! outcome and never aborting the batch on an individual failure. No
//! retries, no rollback: partial deletion across a run is an accepted
//! outcome. Callers are expected to pass only candidate lists produced
//! by analysis - retained copies and files that failed to hash or stat
//! never reach this crate.
//!
//! [`delete_files`] runs synchronously; [`start_delete`] streams
//! progress over a channel and honors a cancellation token.

mod delete;
mod task;

pub use delete::{DeleteOutcome, DeleteReport, delete_files};
pub use task::{DeleteProgress, DeleteResult, start_delete};

/// Default channel buffer size for operation progress updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
