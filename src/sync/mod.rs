//! Incremental vault synchronization engine.
//!
//! This module keeps the search backend consistent with the vault:
//! - Persistent content-fingerprint store (path → hash)
//! - Diff engine classifying scanned notes against the prior mapping
//! - Index writer applying delete/upsert pairs to the backend
//! - Scheduler serializing foreground and timer-driven sync passes

mod diff;
mod fingerprints;
mod scheduler;
mod writer;

pub use diff::{diff_documents, DiffOutcome, PendingPrune, PendingUpsert};
pub use fingerprints::{FingerprintMap, FingerprintStore};
pub use scheduler::SyncScheduler;
pub use writer::{IndexWriter, SyncReport};
