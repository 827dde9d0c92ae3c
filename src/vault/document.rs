//! Document model for vault notes.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp.
pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(0))
        .unwrap_or(0)
}

/// A note read from the vault during a sync pass.
///
/// Identity is the path relative to the vault root. The value is immutable
/// once read; a changed file produces a new `Document` with a new
/// fingerprint on the next pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path relative to the vault root.
    pub rel_path: String,

    /// Raw note content (invalid UTF-8 lossily normalized).
    pub content: String,

    /// Content hash, used as the search backend's entry key.
    pub fingerprint: String,

    /// Last-observed modification time (Unix seconds).
    pub mtime: i64,
}

impl Document {
    /// Create a document from a relative path and its content.
    ///
    /// The fingerprint is computed from the content alone, so metadata
    /// changes never trigger a reindex.
    #[must_use]
    pub fn new(rel_path: impl Into<String>, content: impl Into<String>, mtime: i64) -> Self {
        let content = content.into();
        let fingerprint = compute_fingerprint(&content);
        Self {
            rel_path: rel_path.into(),
            content,
            fingerprint,
            mtime,
        }
    }
}

/// Compute the blake3 content fingerprint.
#[must_use]
pub fn compute_fingerprint(content: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(content.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_stable() {
        let hash1 = compute_fingerprint("hello");
        let hash2 = compute_fingerprint("hello");
        let hash3 = compute_fingerprint("world");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64); // blake3 hex is 64 chars
    }

    #[test]
    fn test_document_fingerprint_from_content() {
        let doc = Document::new("notes/a.md", "hello", 100);
        assert_eq!(doc.fingerprint, compute_fingerprint("hello"));
        assert_eq!(doc.rel_path, "notes/a.md");
        assert_eq!(doc.mtime, 100);
    }

    #[test]
    fn test_same_content_different_path_same_fingerprint() {
        let a = Document::new("a.md", "same", 1);
        let b = Document::new("b.md", "same", 2);
        assert_eq!(a.fingerprint, b.fingerprint);
    }
}
