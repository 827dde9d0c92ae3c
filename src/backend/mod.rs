//! Pluggable search backend capability.
//!
//! The sync engine and the query façade talk to the knowledge store through
//! the fixed `SearchBackend` trait. Entries are content-addressed: the key
//! is the document's content fingerprint, never its path, so re-saving
//! unchanged content is a no-op and a changed note is stored under a new
//! key while the old key is evicted.

mod sqlite;

use serde::{Deserialize, Serialize};

use crate::vault::Document;
use crate::Result;

pub use sqlite::{Database, SqliteBackend};

/// One entry in the search backend, keyed by content fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Content fingerprint; the backend key.
    pub fingerprint: String,

    /// Vault-relative path of the source note.
    pub rel_path: String,

    /// Note content.
    pub content: String,

    /// Source file modification time (Unix seconds).
    pub mtime: i64,

    /// Unix timestamp when the entry was written.
    pub indexed_at: i64,
}

impl IndexEntry {
    /// Build an entry from a scanned document.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            fingerprint: doc.fingerprint.clone(),
            rel_path: doc.rel_path.clone(),
            content: doc.content.clone(),
            mtime: doc.mtime,
            indexed_at: crate::vault::now_unix(),
        }
    }
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Vault-relative path of the matching note.
    pub rel_path: String,

    /// Fingerprint of the indexed content that matched.
    pub fingerprint: String,

    /// Relevance score; higher is better.
    pub score: f32,

    /// Short excerpt around the match.
    pub snippet: String,
}

/// Capability set every search backend must provide.
///
/// Implementations must be safe to share across the sync task and
/// concurrent query callers (`Arc<dyn SearchBackend>`); `search` may
/// observe pre- or post-sync state but never a torn single-entry write.
pub trait SearchBackend: Send + Sync {
    /// Insert or replace the entry stored under its fingerprint.
    ///
    /// Upsert-by-key is idempotent: re-writing the same entry leaves
    /// exactly one copy under that key.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    fn upsert(&self, entry: &IndexEntry) -> Result<()>;

    /// Delete the entry stored under the given fingerprint, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete cannot be executed.
    fn delete_by_key(&self, fingerprint: &str) -> Result<()>;

    /// Ranked full-text search.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be executed.
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>>;

    /// Whether the backing index exists and is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails.
    fn exists(&self) -> Result<bool>;
}
