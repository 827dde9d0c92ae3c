//! Diff engine: classify scanned documents against the prior mapping.

use std::collections::HashSet;

use super::fingerprints::FingerprintMap;
use crate::vault::Document;

/// A document that must be written to the backend.
#[derive(Debug, Clone)]
pub struct PendingUpsert {
    /// The new document value.
    pub document: Document,
    /// Hash the path was previously indexed under, if any. The writer
    /// evicts this content-addressed key before upserting the new one.
    pub prior_fingerprint: Option<String>,
}

/// A fingerprint entry whose note no longer exists on disk.
#[derive(Debug, Clone)]
pub struct PendingPrune {
    pub rel_path: String,
    pub fingerprint: String,
}

/// Result of diffing one scan against the fingerprint mapping.
#[derive(Debug, Default)]
pub struct DiffOutcome {
    /// New or changed documents, each carrying its prior hash.
    pub upserts: Vec<PendingUpsert>,
    /// Entries to purge; only populated when pruning is enabled.
    pub prunes: Vec<PendingPrune>,
    /// Documents whose content hash matches the prior mapping.
    pub unchanged: usize,
}

/// Classify each scanned document as unchanged or new-or-changed.
///
/// A document is unchanged iff its content hash equals the hash recorded
/// for its path; decisions are independent across documents and carry no
/// ordering guarantee. Mapping entries with no corresponding document on
/// disk are left alone unless `prune_deleted` is set, in which case they
/// are emitted for purging.
#[must_use]
pub fn diff_documents(
    documents: Vec<Document>,
    prior: &FingerprintMap,
    prune_deleted: bool,
) -> DiffOutcome {
    let mut outcome = DiffOutcome::default();

    let mut seen: HashSet<&str> = HashSet::new();
    if prune_deleted {
        seen.reserve(documents.len());
        // Borrow the prior map's keys so `seen` outlives the consuming
        // loop below.
        for document in &documents {
            if let Some((key, _)) = prior.get_key_value(document.rel_path.as_str()) {
                seen.insert(key.as_str());
            }
        }
    }

    for document in documents {
        match prior.get(&document.rel_path) {
            Some(prior_hash) if *prior_hash == document.fingerprint => {
                outcome.unchanged += 1;
            }
            Some(prior_hash) => {
                outcome.upserts.push(PendingUpsert {
                    prior_fingerprint: Some(prior_hash.clone()),
                    document,
                });
            }
            None => {
                outcome.upserts.push(PendingUpsert {
                    prior_fingerprint: None,
                    document,
                });
            }
        }
    }

    if prune_deleted {
        for (rel_path, fingerprint) in prior {
            if !seen.contains(rel_path.as_str()) {
                outcome.prunes.push(PendingPrune {
                    rel_path: rel_path.clone(),
                    fingerprint: fingerprint.clone(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::compute_fingerprint;

    fn doc(path: &str, content: &str) -> Document {
        Document::new(path, content, 100)
    }

    fn mapping(entries: &[(&str, &str)]) -> FingerprintMap {
        entries
            .iter()
            .map(|(p, h)| ((*p).to_string(), (*h).to_string()))
            .collect()
    }

    #[test]
    fn test_all_new() {
        let outcome = diff_documents(
            vec![doc("a.md", "one"), doc("b.md", "two")],
            &FingerprintMap::new(),
            false,
        );

        assert_eq!(outcome.upserts.len(), 2);
        assert_eq!(outcome.unchanged, 0);
        assert!(outcome.prunes.is_empty());
        assert!(outcome
            .upserts
            .iter()
            .all(|u| u.prior_fingerprint.is_none()));
    }

    #[test]
    fn test_unchanged_by_hash() {
        let prior = mapping(&[("a.md", &compute_fingerprint("one"))]);

        let outcome = diff_documents(vec![doc("a.md", "one")], &prior, false);

        assert_eq!(outcome.unchanged, 1);
        assert!(outcome.upserts.is_empty());
    }

    #[test]
    fn test_changed_carries_prior_hash() {
        let old_hash = compute_fingerprint("one");
        let prior = mapping(&[("a.md", &old_hash)]);

        let outcome = diff_documents(vec![doc("a.md", "one edited")], &prior, false);

        assert_eq!(outcome.upserts.len(), 1);
        assert_eq!(
            outcome.upserts[0].prior_fingerprint.as_deref(),
            Some(old_hash.as_str())
        );
    }

    #[test]
    fn test_missing_documents_kept_by_default() {
        let prior = mapping(&[("gone.md", "stale-hash")]);

        let outcome = diff_documents(vec![], &prior, false);

        assert!(outcome.prunes.is_empty());
        assert!(outcome.upserts.is_empty());
    }

    #[test]
    fn test_missing_documents_pruned_when_enabled() {
        let prior = mapping(&[
            ("gone.md", "stale-hash"),
            ("kept.md", &compute_fingerprint("still here")),
        ]);

        let outcome = diff_documents(vec![doc("kept.md", "still here")], &prior, true);

        assert_eq!(outcome.unchanged, 1);
        assert_eq!(outcome.prunes.len(), 1);
        assert_eq!(outcome.prunes[0].rel_path, "gone.md");
        assert_eq!(outcome.prunes[0].fingerprint, "stale-hash");
    }

    #[test]
    fn test_decisions_are_independent() {
        let prior = mapping(&[
            ("a.md", &compute_fingerprint("one")),
            ("b.md", &compute_fingerprint("old two")),
        ]);

        let outcome = diff_documents(
            vec![doc("a.md", "one"), doc("b.md", "new two"), doc("c.md", "three")],
            &prior,
            false,
        );

        assert_eq!(outcome.unchanged, 1);
        assert_eq!(outcome.upserts.len(), 2);
    }
}
