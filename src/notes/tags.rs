//! Tag extraction and lookup.
//!
//! Tags are `#word` tokens inside note content. The vault-wide tag set is
//! cached as JSON in the assistant data directory and rebuilt whenever the
//! cache is missing or unreadable.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::walk_notes;
use crate::Result;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("tag pattern is valid"));

/// Extract all `#tag` tokens from note content.
#[must_use]
pub fn extract_tags(content: &str) -> BTreeSet<String> {
    TAG_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The unique tag set across the whole vault.
///
/// Uses the JSON cache at `cache_path` when present; otherwise scans every
/// note, rebuilds the set, and writes the cache. A cache write failure is
/// logged and the freshly scanned set is still returned.
///
/// # Errors
///
/// Currently infallible beyond the `Result` contract; unreadable notes are
/// skipped with a warning.
pub fn vault_tags(vault_dir: &Path, cache_path: &Path) -> Result<BTreeSet<String>> {
    if let Some(cached) = load_cache(cache_path) {
        tracing::debug!(count = cached.len(), "Using cached tag set");
        return Ok(cached);
    }

    let mut tags = BTreeSet::new();
    for entry in walk_notes(vault_dir) {
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => tags.extend(extract_tags(&content)),
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable note");
            }
        }
    }

    if let Err(e) = save_cache(cache_path, &tags) {
        tracing::warn!(path = %cache_path.display(), error = %e, "Failed to write tag cache");
    }

    tracing::debug!(count = tags.len(), "Rebuilt vault tag set");
    Ok(tags)
}

/// Notes containing `#tag`, case-insensitively, as vault-relative paths.
///
/// The leading `#` on the tag argument is optional.
#[must_use]
pub fn search_by_tag(vault_dir: &Path, tag: &str) -> Vec<String> {
    let needle = format!("#{}", tag.trim_start_matches('#').to_lowercase());

    let mut matches = BTreeSet::new();
    for entry in walk_notes(vault_dir) {
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => {
                if content.to_lowercase().contains(&needle) {
                    matches.insert(super::rel_string(vault_dir, entry.path()));
                }
            }
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable note");
            }
        }
    }

    matches.into_iter().collect()
}

fn load_cache(cache_path: &Path) -> Option<BTreeSet<String>> {
    let bytes = std::fs::read(cache_path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(tags) => Some(tags),
        Err(e) => {
            tracing::warn!(path = %cache_path.display(), error = %e, "Ignoring corrupt tag cache");
            None
        }
    }
}

fn save_cache(cache_path: &Path, tags: &BTreeSet<String>) -> Result<()> {
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(tags).map_err(|e| crate::Error::internal(e.to_string()))?;
    std::fs::write(cache_path, json)?;
    Ok(())
}
