//! `SQLite` FTS5 search backend.
//!
//! Stores note content in an FTS5 table keyed by content fingerprint and
//! answers bm25-ranked queries. The connection wrapper provides:
//! - WAL mode for concurrent reads during a sync pass
//! - Serialized write access (via `parking_lot::Mutex`)
//! - An in-memory constructor for tests

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;

use super::{IndexEntry, SearchBackend, SearchHit};
use crate::error::BackendError;
use crate::Result;

/// FTS5 table holding indexed notes.
const NOTES_TABLE: &str = "notes_fts";

/// Database connection wrapper.
///
/// Wraps a `SQLite` connection with proper configuration and locking.
/// Clone is cheap - it just clones the Arc.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl Database {
    /// Open a database at the given path.
    ///
    /// Creates the database file and parent directories if they don't exist.
    /// Configures WAL mode and performance settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or configured.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let path_str = path.to_string_lossy().to_string();

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| BackendError::Database(format!("failed to open database: {e}")))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path_str,
        };

        db.configure()?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            BackendError::Database(format!("failed to open in-memory database: {e}"))
        })?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: ":memory:".to_string(),
        };

        db.configure()?;

        Ok(db)
    }

    /// Configure database settings.
    fn configure(&self) -> Result<()> {
        {
            let conn = self.conn.lock();

            conn.execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA temp_store = MEMORY;
                PRAGMA busy_timeout = 5000;
                ",
            )
            .map_err(|e| BackendError::Database(format!("failed to configure database: {e}")))?;
        }

        tracing::debug!(path = %self.path, "Database configured with WAL mode");

        Ok(())
    }

    /// Execute a function with exclusive database access.
    ///
    /// # Errors
    ///
    /// Returns an error if the function fails.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Get the database path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// FTS5-backed implementation of the `SearchBackend` capability.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    /// Open (and if necessary create) the search index at the given path.
    ///
    /// With `recreate` set, any existing index table is dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the index
    /// table cannot be created.
    pub fn open(path: impl AsRef<Path>, recreate: bool) -> Result<Self> {
        let backend = Self {
            db: Database::open(path)?,
        };
        backend.init(recreate)?;
        Ok(backend)
    }

    /// Open an in-memory index for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn in_memory() -> Result<Self> {
        let backend = Self {
            db: Database::open_in_memory()?,
        };
        backend.init(false)?;
        Ok(backend)
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    fn init(&self, recreate: bool) -> Result<()> {
        self.db.with_conn(|conn| {
            if recreate {
                conn.execute_batch(&format!("DROP TABLE IF EXISTS {NOTES_TABLE}"))
                    .map_err(|e| BackendError::Database(format!("failed to drop index: {e}")))?;
                tracing::info!("Dropped existing search index for recreation");
            }

            conn.execute_batch(&format!(
                "CREATE VIRTUAL TABLE IF NOT EXISTS {NOTES_TABLE} USING fts5(
                    content,
                    fingerprint UNINDEXED,
                    path UNINDEXED,
                    mtime UNINDEXED,
                    indexed_at UNINDEXED
                )"
            ))
            .map_err(|e| BackendError::Database(format!("failed to create index: {e}")))?;
            Ok(())
        })
    }

    /// Count indexed entries. Exposed for diagnostics and tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub fn count_entries(&self) -> Result<i64> {
        self.db.with_conn(|conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {NOTES_TABLE}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| BackendError::Database(e.to_string()).into())
        })
    }
}

impl SearchBackend for SqliteBackend {
    fn upsert(&self, entry: &IndexEntry) -> Result<()> {
        self.db.with_conn(|conn| {
            // FTS5 tables have no primary-key upsert; delete-then-insert
            // inside one transaction gives the same idempotent contract.
            conn.execute_batch("BEGIN IMMEDIATE")
                .map_err(|e| BackendError::Database(format!("failed to begin upsert: {e}")))?;

            let result = conn
                .execute(
                    &format!("DELETE FROM {NOTES_TABLE} WHERE fingerprint = ?"),
                    [&entry.fingerprint],
                )
                .and_then(|_| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {NOTES_TABLE} (content, fingerprint, path, mtime, indexed_at) \
                             VALUES (?, ?, ?, ?, ?)"
                        ),
                        rusqlite::params![
                            entry.content,
                            entry.fingerprint,
                            entry.rel_path,
                            entry.mtime,
                            entry.indexed_at
                        ],
                    )
                });

            match result {
                Ok(_) => {
                    conn.execute_batch("COMMIT")
                        .map_err(|e| BackendError::Database(format!("failed to commit upsert: {e}")))?;
                    Ok(())
                }
                Err(e) => {
                    let _ = conn.execute_batch("ROLLBACK");
                    Err(BackendError::Database(format!("failed to upsert entry: {e}")).into())
                }
            }
        })
    }

    fn delete_by_key(&self, fingerprint: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                &format!("DELETE FROM {NOTES_TABLE} WHERE fingerprint = ?"),
                [fingerprint],
            )
            .map_err(|e| BackendError::Database(format!("failed to delete entry: {e}")))?;
            Ok(())
        })
    }

    fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        // Quote the user text so it is matched as a phrase instead of being
        // parsed as FTS5 query syntax.
        let phrase = format!("\"{}\"", query.replace('"', "\"\""));

        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT path, fingerprint, bm25({NOTES_TABLE}),
                            snippet({NOTES_TABLE}, 0, '', '', '…', 12)
                     FROM {NOTES_TABLE}
                     WHERE {NOTES_TABLE} MATCH ?
                     ORDER BY bm25({NOTES_TABLE})
                     LIMIT ?",
                ))
                .map_err(|e| BackendError::Query(format!("failed to prepare search: {e}")))?;

            #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
            let rows = stmt
                .query_map(rusqlite::params![phrase, top_k as i64], |row| {
                    let rank: f64 = row.get(2)?;
                    Ok(SearchHit {
                        rel_path: row.get(0)?,
                        fingerprint: row.get(1)?,
                        // bm25 ranks are smaller-is-better; flip the sign so
                        // callers see higher-is-better scores.
                        score: -rank as f32,
                        snippet: row.get(3)?,
                    })
                })
                .map_err(|e| BackendError::Query(format!("failed to execute search: {e}")))?;

            let mut hits = Vec::new();
            for row in rows {
                hits.push(
                    row.map_err(|e| BackendError::Query(format!("failed to read result: {e}")))?,
                );
            }

            tracing::debug!(count = hits.len(), top_k, "Search completed");
            Ok(hits)
        })
    }

    fn exists(&self) -> Result<bool> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                    [NOTES_TABLE],
                    |row| row.get(0),
                )
                .map_err(|e| BackendError::Database(e.to_string()))?;
            Ok(count > 0)
        })
    }
}
