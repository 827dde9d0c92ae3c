//! Error types and Result aliases for vaultmind.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using vaultmind's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vaultmind operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Fingerprint store error.
    #[error("fingerprint store error: {0}")]
    Store(#[from] StoreError),

    /// Search backend error.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Vault/note access error.
    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Fingerprint store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persisted mapping could not be parsed.
    #[error("corrupt fingerprint file '{path}': {reason}")]
    Corrupt { path: String, reason: String },

    /// Writing the mapping to durable storage failed.
    #[error("failed to persist fingerprint file '{path}': {reason}")]
    Persist { path: String, reason: String },
}

/// Search backend errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// `SQLite` database error.
    #[error("database error: {0}")]
    Database(String),

    /// The backing index does not exist or is unusable.
    #[error("index unavailable: {0}")]
    Unavailable(String),

    /// The query could not be executed.
    #[error("query error: {0}")]
    Query(String),
}

/// Vault and note access errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Note does not exist.
    #[error("note '{name}' not found")]
    NoteNotFound { name: String },

    /// Note already exists and would be overwritten.
    #[error("note '{name}' already exists")]
    NoteExists { name: String },

    /// Path points outside the vault or is not a directory.
    #[error("invalid vault path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl VaultError {
    /// Create an invalid-path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests;
