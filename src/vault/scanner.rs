//! Vault scanner for sync passes.
//!
//! Walks the vault directory tree and reads every matching note. The scan
//! is restartable: each sync pass re-invokes it and gets the current state
//! of the filesystem. Unreadable files are skipped with a warning so a
//! single bad note cannot abort a pass.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ignore::WalkBuilder;

use super::document::Document;
use crate::Result;

/// Scan statistics.
#[derive(Debug, Default)]
pub struct ScanStats {
    pub notes_found: AtomicU64,
    pub notes_read: AtomicU64,
    pub notes_skipped: AtomicU64,
    pub errors: AtomicU64,
}

impl ScanStats {
    /// Create new stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current stats.
    #[must_use]
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            notes_found: self.notes_found.load(Ordering::Relaxed),
            notes_read: self.notes_read.load(Ordering::Relaxed),
            notes_skipped: self.notes_skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of scan stats.
#[derive(Debug, Clone, Copy)]
pub struct ScanStatsSnapshot {
    pub notes_found: u64,
    pub notes_read: u64,
    pub notes_skipped: u64,
    pub errors: u64,
}

/// Result of one vault scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Documents read from disk, identified by vault-relative path.
    pub documents: Vec<Document>,
    /// Counters for the scan.
    pub stats: ScanStatsSnapshot,
}

/// Scan the vault and read every note with the given extension.
///
/// Hidden entries are skipped, which keeps the assistant data directory
/// out of the scan. Files that cannot be read are logged and skipped;
/// invalid UTF-8 is lossily replaced rather than treated as an error.
///
/// # Errors
///
/// Returns an error only if the vault root itself cannot be walked.
pub fn scan_vault(vault_dir: &Path, extension: &str) -> Result<ScanOutcome> {
    let stats = ScanStats::new();
    let mut documents = Vec::new();

    tracing::debug!(vault = %vault_dir.display(), "Starting vault scan");

    let walker = WalkBuilder::new(vault_dir)
        .hidden(true) // skip dotfiles and dotdirs (.assistant, .git, ...)
        .git_ignore(true)
        .ignore(true)
        .parents(false)
        .build();

    for entry in walker {
        match entry {
            Ok(entry) => {
                let path = entry.path();

                if path.is_dir() {
                    continue;
                }

                if !path.extension().is_some_and(|e| e == extension) {
                    stats.notes_skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }

                stats.notes_found.fetch_add(1, Ordering::Relaxed);

                match read_note(vault_dir, path) {
                    Ok(doc) => {
                        stats.notes_read.fetch_add(1, Ordering::Relaxed);
                        documents.push(doc);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable note");
                        stats.errors.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error walking vault");
                stats.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    let snapshot = stats.snapshot();
    tracing::debug!(
        vault = %vault_dir.display(),
        found = snapshot.notes_found,
        read = snapshot.notes_read,
        skipped = snapshot.notes_skipped,
        errors = snapshot.errors,
        "Vault scan complete"
    );

    Ok(ScanOutcome {
        documents,
        stats: snapshot,
    })
}

/// Read a single note into a `Document`.
fn read_note(vault_dir: &Path, path: &Path) -> std::io::Result<Document> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let rel_path = path
        .strip_prefix(vault_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();

    #[allow(clippy::cast_possible_wrap)]
    let mtime = std::fs::metadata(path)?
        .modified()
        .map(|t| {
            t.duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as i64
        })
        .unwrap_or(0);

    Ok(Document::new(rel_path, content, mtime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_reads_markdown_notes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "hello").unwrap();
        let sub = tmp.path().join("projects");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.md"), "world").unwrap();
        fs::write(tmp.path().join("notes.txt"), "not a note").unwrap();

        let outcome = scan_vault(tmp.path(), "md").unwrap();

        assert_eq!(outcome.documents.len(), 2);
        assert_eq!(outcome.stats.notes_read, 2);

        let mut paths: Vec<&str> = outcome
            .documents
            .iter()
            .map(|d| d.rel_path.as_str())
            .collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["a.md", "projects/b.md"]);
    }

    #[test]
    fn test_scan_skips_hidden_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "visible").unwrap();

        let hidden = tmp.path().join(".assistant");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("internal.md"), "state").unwrap();

        let outcome = scan_vault(tmp.path(), "md").unwrap();

        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.documents[0].rel_path, "a.md");
    }

    #[test]
    fn test_scan_normalizes_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.md"), [0x68, 0x69, 0xFF, 0xFE]).unwrap();
        fs::write(tmp.path().join("good.md"), "fine").unwrap();

        let outcome = scan_vault(tmp.path(), "md").unwrap();

        // Both notes survive the scan; invalid bytes are replaced.
        assert_eq!(outcome.documents.len(), 2);
        let bad = outcome
            .documents
            .iter()
            .find(|d| d.rel_path == "bad.md")
            .unwrap();
        assert!(bad.content.starts_with("hi"));
        assert!(bad.content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_scan_empty_vault() {
        let tmp = TempDir::new().unwrap();
        let outcome = scan_vault(tmp.path(), "md").unwrap();
        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.stats.notes_found, 0);
    }

    #[test]
    fn test_rescan_restartable() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "one").unwrap();

        let first = scan_vault(tmp.path(), "md").unwrap();
        fs::write(tmp.path().join("b.md"), "two").unwrap();
        let second = scan_vault(tmp.path(), "md").unwrap();

        assert_eq!(first.documents.len(), 1);
        assert_eq!(second.documents.len(), 2);
    }
}
