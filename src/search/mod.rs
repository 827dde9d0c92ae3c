//! Read-only query façade over the search backend.

use std::sync::Arc;

use crate::backend::{SearchBackend, SearchHit};
use crate::{Error, Result};

/// Issues ranked searches against the backend.
///
/// Holds a read-only handle; never mutates fingerprint state or triggers a
/// sync, and is safe to call while a sync pass is running (results reflect
/// either the pre- or post-sync index state).
#[derive(Clone)]
pub struct Searcher {
    backend: Arc<dyn SearchBackend>,
}

impl Searcher {
    /// Create a searcher over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Ranked full-text search over the indexed notes.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty query, a missing index, or a backend
    /// failure.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::internal("query cannot be empty"));
        }

        if !self.backend.exists()? {
            return Err(crate::error::BackendError::Unavailable(
                "search index has not been created yet, run a sync first".to_string(),
            )
            .into());
        }

        self.backend.search(query, top_k)
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{IndexEntry, SqliteBackend};
    use crate::vault::Document;

    fn searcher_with_notes(notes: &[(&str, &str)]) -> Searcher {
        let backend = SqliteBackend::in_memory().unwrap();
        for (path, content) in notes {
            let entry = IndexEntry::from_document(&Document::new(*path, *content, 1));
            crate::backend::SearchBackend::upsert(&backend, &entry).unwrap();
        }
        Searcher::new(Arc::new(backend))
    }

    #[test]
    fn test_search_returns_ranked_hits() {
        let searcher = searcher_with_notes(&[
            ("recipes/pasta.md", "pasta with garlic and olive oil"),
            ("recipes/salad.md", "green salad with olive oil"),
            ("journal.md", "went for a run today"),
        ]);

        let hits = searcher.search("olive oil", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.rel_path.starts_with("recipes/")));
        // Ranked: best score first.
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_empty_query_rejected() {
        let searcher = searcher_with_notes(&[]);
        assert!(searcher.search("   ", 10).is_err());
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let searcher = searcher_with_notes(&[("a.md", "hello")]);
        let hits = searcher.search("unrelated", 10).unwrap();
        assert!(hits.is_empty());
    }
}
