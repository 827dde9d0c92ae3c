//! Sync scheduler: serialized foreground and timer-driven sync passes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::diff::diff_documents;
use super::fingerprints::{FingerprintMap, FingerprintStore};
use super::writer::{IndexWriter, SyncReport};
use crate::backend::SearchBackend;
use crate::config::Config;
use crate::vault::scan_vault;
use crate::{Error, Result};

/// Shared state of the sync engine: the fingerprint mapping plus
/// everything one pass needs. The async mutex around the mapping is what
/// guarantees at most one pass runs at a time.
struct SyncCore {
    vault_dir: PathBuf,
    note_extension: String,
    prune_deleted: bool,
    store: FingerprintStore,
    backend: Arc<dyn SearchBackend>,
    state: tokio::sync::Mutex<FingerprintMap>,
}

impl SyncCore {
    /// Run one full sync pass: scan → diff → write → persist.
    async fn run_pass(&self) -> Result<SyncReport> {
        let mut state = self.state.lock().await;

        let vault_dir = self.vault_dir.clone();
        let extension = self.note_extension.clone();
        let scan = tokio::task::spawn_blocking(move || scan_vault(&vault_dir, &extension))
            .await
            .map_err(|e| Error::internal(format!("scan task failed: {e}")))??;

        let outcome = diff_documents(scan.documents, &state, self.prune_deleted);

        let writer = IndexWriter::new(Arc::clone(&self.backend));
        let mut report = writer.apply(outcome, &mut state);
        #[allow(clippy::cast_possible_truncation)]
        {
            report.scanned = scan.stats.notes_read as usize;
        }

        if report.backend_writes() > 0 {
            if let Err(e) = self.store.save(&state) {
                tracing::warn!(
                    error = %e,
                    "Fingerprint persistence failed; next pass will redo this diff"
                );
            }
        }

        tracing::info!(
            scanned = report.scanned,
            unchanged = report.unchanged,
            upserted = report.upserted,
            deleted = report.deleted,
            pruned = report.pruned,
            failed = report.failed,
            "Sync pass complete"
        );

        Ok(report)
    }
}

/// Drives sync passes against one vault.
///
/// The scheduler exclusively owns the in-memory fingerprint mapping; a
/// pass triggered while another is active queues behind it and runs
/// immediately after, picking up any changes made in the meantime.
///
/// Background syncing is an explicit lifecycle: nothing runs until
/// [`start`](Self::start) and no new pass is scheduled after
/// [`stop`](Self::stop); an in-flight pass is always allowed to finish.
pub struct SyncScheduler {
    core: Arc<SyncCore>,
    cancel: CancellationToken,
    task: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl SyncScheduler {
    /// Create a scheduler, loading persisted fingerprint state if present.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing fingerprint file cannot be parsed.
    pub fn new(config: &Config, backend: Arc<dyn SearchBackend>) -> Result<Self> {
        let store = FingerprintStore::new(config.fingerprint_path());
        let state = store.load()?;

        tracing::debug!(
            entries = state.len(),
            path = %store.path().display(),
            "Loaded fingerprint state"
        );

        Ok(Self {
            core: Arc::new(SyncCore {
                vault_dir: config.vault_dir.clone(),
                note_extension: config.note_extension.clone(),
                prune_deleted: config.prune_deleted,
                store,
                backend,
                state: tokio::sync::Mutex::new(state),
            }),
            cancel: CancellationToken::new(),
            task: parking_lot::Mutex::new(None),
        })
    }

    /// Run one sync pass in the foreground.
    ///
    /// Blocks (asynchronously) until any in-progress pass finishes, then
    /// runs its own. A fingerprint persistence failure is downgraded to a
    /// warning: the durable state keeps its previous value and the next
    /// pass simply redoes the same diff.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be scanned at all; per-note
    /// and per-write failures are absorbed into the report instead.
    pub async fn sync_once(&self) -> Result<SyncReport> {
        self.core.run_pass().await
    }

    /// Start the background timer loop.
    ///
    /// Has no effect if the loop is already running. The first pass fires
    /// one interval after start; callers wanting an immediate pass run
    /// [`sync_once`](Self::sync_once) in the foreground first.
    pub fn start(&self, interval: Duration) {
        let mut task = self.task.lock();
        if task.is_some() {
            tracing::warn!("Sync scheduler already started");
            return;
        }

        let core = Arc::clone(&self.core);
        let cancel = self.cancel.clone();

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick of `interval` resolves immediately.
            ticker.tick().await;

            tracing::info!(interval_secs = interval.as_secs(), "Background sync started");

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = core.run_pass().await {
                            tracing::error!(error = %e, "Background sync pass failed");
                        }
                    }
                }
            }

            tracing::info!("Background sync stopped");
        }));
    }

    /// Stop the background loop.
    ///
    /// Refuses to schedule further passes and waits for an in-flight pass
    /// to finish, so state is never left half-applied.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(handle) = task {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Background sync task aborted");
            }
        }
    }

    /// Snapshot of the current fingerprint mapping.
    ///
    /// Intended for diagnostics; waits for any in-progress pass.
    pub async fn fingerprints(&self) -> FingerprintMap {
        self.core.state.lock().await.clone()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        // Signal the background loop to exit if the scheduler is dropped
        // without an explicit stop; any in-flight pass still finishes.
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("vault_dir", &self.core.vault_dir)
            .finish_non_exhaustive()
    }
}
