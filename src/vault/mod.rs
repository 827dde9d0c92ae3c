//! Vault access: document model and directory scanning.
//!
//! A vault is a directory tree of plain-text notes. This module provides:
//! - The `Document` value produced for each note during a sync pass
//! - A restartable scanner that walks the vault and reads note content

mod document;
mod scanner;

pub(crate) use document::now_unix;
pub use document::{compute_fingerprint, Document};
pub use scanner::{scan_vault, ScanOutcome, ScanStats, ScanStatsSnapshot};
