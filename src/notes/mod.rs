//! Note-level utilities over the vault.
//!
//! File helpers the assistant exposes alongside the search index: reading,
//! creating and appending to notes, listing vault directories, and simple
//! name/content lookups. All paths are resolved relative to the vault root
//! and must stay inside it.

pub mod tags;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::VaultError;
use crate::Result;

/// Marker below which assistant-generated content is inserted.
pub const AI_MARKER: &str = "<!-- AI -->";

/// Resolve a note or directory name against the vault root.
///
/// Rejects absolute paths and any component that would escape the vault.
fn resolve(vault_dir: &Path, name: &str) -> Result<PathBuf> {
    let candidate = Path::new(name);

    if candidate.is_absolute() {
        return Err(VaultError::invalid_path(name, "absolute paths are not allowed").into());
    }

    if candidate
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(VaultError::invalid_path(name, "escapes the vault").into());
    }

    Ok(vault_dir.join(candidate))
}

/// Walk all notes under the vault, skipping hidden entries.
fn walk_notes(vault_dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(vault_dir)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e
                    .file_name()
                    .to_string_lossy()
                    .starts_with('.')
        })
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "md")
        })
}

fn rel_string(vault_dir: &Path, path: &Path) -> String {
    path.strip_prefix(vault_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Read a note's content.
///
/// # Errors
///
/// Returns `VaultError::NoteNotFound` if the note does not exist.
pub fn read_note(vault_dir: &Path, name: &str) -> Result<String> {
    let path = resolve(vault_dir, name)?;
    if !path.is_file() {
        return Err(VaultError::NoteNotFound {
            name: name.to_string(),
        }
        .into());
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Create a new note.
///
/// # Errors
///
/// Returns `VaultError::NoteExists` rather than overwriting an existing
/// note.
pub fn create_note(vault_dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = resolve(vault_dir, name)?;
    if path.exists() {
        return Err(VaultError::NoteExists {
            name: name.to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;

    tracing::debug!(note = name, "Created note");
    Ok(())
}

/// Append assistant content to an existing note.
///
/// When the note contains `marker`, the content is inserted directly below
/// its first occurrence; otherwise it is appended at the end of the file.
///
/// # Errors
///
/// Returns `VaultError::NoteNotFound` if the note does not exist.
pub fn append_to_note(vault_dir: &Path, name: &str, content: &str, marker: &str) -> Result<()> {
    let path = resolve(vault_dir, name)?;
    if !path.is_file() {
        return Err(VaultError::NoteNotFound {
            name: name.to_string(),
        }
        .into());
    }

    let text = std::fs::read_to_string(&path)?;
    let updated = if text.contains(marker) {
        text.replacen(marker, &format!("{marker}\n{content}"), 1)
    } else {
        format!("{text}\n\n{content}")
    };
    std::fs::write(&path, updated)?;

    tracing::debug!(note = name, "Appended to note");
    Ok(())
}

/// List a vault directory; subdirectories are suffixed with `/`.
///
/// # Errors
///
/// Returns an error if the directory does not exist or cannot be read.
pub fn list_directory(vault_dir: &Path, dir: &str) -> Result<Vec<String>> {
    let path = resolve(vault_dir, dir.trim_start_matches(['/', '\\']))?;

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(&path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            entries.push(format!("{name}/"));
        } else {
            entries.push(name);
        }
    }
    entries.sort();
    Ok(entries)
}

/// Notes modified within the last `days` days, as vault-relative paths.
///
/// # Errors
///
/// Returns an error only if the cutoff cannot be computed; unreadable
/// entries are skipped.
pub fn recently_modified(vault_dir: &Path, days: i64) -> Result<Vec<String>> {
    let cutoff = chrono::Utc::now() - chrono::Duration::days(days);

    let mut recent = Vec::new();
    for entry in walk_notes(vault_dir) {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if chrono::DateTime::<chrono::Utc>::from(modified) > cutoff {
            recent.push(rel_string(vault_dir, entry.path()));
        }
    }
    recent.sort();
    Ok(recent)
}

/// Notes whose filename or content contains `query`, case-insensitively.
///
/// Unreadable notes are skipped; results are deduplicated and sorted.
#[must_use]
pub fn search_note_file(vault_dir: &Path, query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut matches = std::collections::BTreeSet::new();

    for entry in walk_notes(vault_dir) {
        let rel = rel_string(vault_dir, entry.path());

        if entry
            .file_name()
            .to_string_lossy()
            .to_lowercase()
            .contains(&needle)
        {
            matches.insert(rel);
            continue;
        }

        match std::fs::read_to_string(entry.path()) {
            Ok(content) => {
                if content.to_lowercase().contains(&needle) {
                    matches.insert(rel);
                }
            }
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable note");
            }
        }
    }

    matches.into_iter().collect()
}
