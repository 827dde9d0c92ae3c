//! Index writer: apply diff decisions to the search backend.

use std::sync::Arc;

use super::diff::DiffOutcome;
use super::fingerprints::FingerprintMap;
use crate::backend::{IndexEntry, SearchBackend};

/// Accounting for one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Notes read from disk by the scan.
    pub scanned: usize,
    /// Notes whose fingerprint matched the prior mapping.
    pub unchanged: usize,
    /// Entries written to the backend under a new key.
    pub upserted: usize,
    /// Old content-addressed keys evicted for changed notes.
    pub deleted: usize,
    /// Entries purged for notes removed from the vault.
    pub pruned: usize,
    /// Documents skipped because a backend write failed.
    pub failed: usize,
}

impl SyncReport {
    /// Total number of backend mutations performed.
    #[must_use]
    pub const fn backend_writes(&self) -> usize {
        self.upserted + self.deleted + self.pruned
    }
}

/// Applies diff decisions to the backend and advances the fingerprint
/// mapping for each document whose backend write succeeded.
pub struct IndexWriter {
    backend: Arc<dyn SearchBackend>,
}

impl IndexWriter {
    /// Create a writer over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Apply one batch of decisions.
    ///
    /// Per document: evict the prior content-addressed key (if any), upsert
    /// under the new key, then advance the in-memory fingerprint entry. The
    /// fingerprint is only advanced after the backend accepted the write,
    /// so a failed document is re-detected and retried on the next pass. A
    /// failure never aborts the rest of the batch.
    ///
    /// Persisting the mapping is the caller's job, once per batch.
    pub fn apply(&self, outcome: DiffOutcome, fingerprints: &mut FingerprintMap) -> SyncReport {
        let mut report = SyncReport {
            unchanged: outcome.unchanged,
            ..SyncReport::default()
        };

        for pending in outcome.upserts {
            let document = pending.document;

            if let Some(prior) = pending.prior_fingerprint {
                if let Err(e) = self.backend.delete_by_key(&prior) {
                    tracing::warn!(
                        path = %document.rel_path,
                        error = %e,
                        "Failed to evict stale entry, will retry next pass"
                    );
                    report.failed += 1;
                    continue;
                }
                report.deleted += 1;
            }

            let entry = IndexEntry::from_document(&document);
            match self.backend.upsert(&entry) {
                Ok(()) => {
                    fingerprints.insert(document.rel_path, document.fingerprint);
                    report.upserted += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %document.rel_path,
                        error = %e,
                        "Failed to index note, will retry next pass"
                    );
                    report.failed += 1;
                }
            }
        }

        for prune in outcome.prunes {
            match self.backend.delete_by_key(&prune.fingerprint) {
                Ok(()) => {
                    fingerprints.remove(&prune.rel_path);
                    report.pruned += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %prune.rel_path,
                        error = %e,
                        "Failed to prune deleted note"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}
