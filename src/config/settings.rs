//! Configuration settings and validation.

use crate::{Error, Result};
use std::path::PathBuf;

/// Name of the hidden assistant data directory inside the vault.
pub const ASSISTANT_DIR: &str = ".assistant";

/// Main configuration for vaultmind.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the note vault.
    pub vault_dir: PathBuf,

    /// Note file extension to index (without the leading dot).
    pub note_extension: String,

    /// Background sync interval in seconds.
    pub sync_interval_secs: u64,

    /// Number of results returned by a search.
    pub top_k: usize,

    /// Purge entries for notes deleted from the vault.
    pub prune_deleted: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault_dir: PathBuf::from("."),
            note_extension: "md".to_string(),
            sync_interval_secs: 1800,
            top_k: 10,
            prune_deleted: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a configuration for the given vault directory.
    #[must_use]
    pub fn new(vault_dir: impl Into<PathBuf>) -> Self {
        Self {
            vault_dir: vault_dir.into(),
            ..Default::default()
        }
    }

    /// Validate configuration values.
    ///
    /// An invalid vault path is the one fatal configuration error: nothing
    /// can proceed without a vault to scan.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.vault_dir.is_dir() {
            return Err(Error::config(format!(
                "vault path '{}' does not exist or is not a directory",
                self.vault_dir.display()
            )));
        }

        if self.note_extension.is_empty() || self.note_extension.starts_with('.') {
            return Err(Error::config(format!(
                "note extension '{}' must be non-empty and given without the leading dot",
                self.note_extension
            )));
        }

        if self.sync_interval_secs == 0 {
            return Err(Error::config("sync interval cannot be 0"));
        }

        if self.top_k == 0 {
            return Err(Error::config("top_k cannot be 0"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Get the hidden assistant data directory inside the vault.
    #[must_use]
    pub fn assistant_dir(&self) -> PathBuf {
        self.vault_dir.join(ASSISTANT_DIR)
    }

    /// Get the path of the persisted fingerprint mapping.
    #[must_use]
    pub fn fingerprint_path(&self) -> PathBuf {
        self.assistant_dir().join("vault_index.json")
    }

    /// Get the path of the search index database.
    #[must_use]
    pub fn index_db_path(&self) -> PathBuf {
        self.assistant_dir().join("index.db")
    }

    /// Get the path of the cached tag list.
    #[must_use]
    pub fn tags_path(&self) -> PathBuf {
        self.assistant_dir().join("tags.json")
    }

    /// Create the assistant data directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_assistant_dir(&self) -> Result<()> {
        std::fs::create_dir_all(self.assistant_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault_config() -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let config = Config::new(tmp.path());
        (tmp, config)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.note_extension, "md");
        assert_eq!(config.sync_interval_secs, 1800);
        assert_eq!(config.top_k, 10);
        assert!(!config.prune_deleted);
    }

    #[test]
    fn test_validate_ok() {
        let (_tmp, config) = vault_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_vault() {
        let config = Config::new("/nonexistent/vault/path");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vault path"));
    }

    #[test]
    fn test_validate_vault_is_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let config = Config::new(&file);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_extension() {
        let (_tmp, mut config) = vault_config();
        config.note_extension = ".md".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extension"));

        config.note_extension = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_interval() {
        let (_tmp, mut config) = vault_config();
        config.sync_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_validate_zero_top_k() {
        let (_tmp, mut config) = vault_config();
        config.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let (_tmp, mut config) = vault_config();
        config.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log level"));
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let (_tmp, mut config) = vault_config();
        for level in ["TRACE", "Debug", "INFO", "Warn", "ERROR"] {
            config.log_level = level.to_string();
            assert!(config.validate().is_ok(), "Level '{level}' should be valid");
        }
    }

    #[test]
    fn test_derived_paths() {
        let config = Config::new("/home/user/vault");
        assert_eq!(
            config.fingerprint_path(),
            PathBuf::from("/home/user/vault/.assistant/vault_index.json")
        );
        assert_eq!(
            config.index_db_path(),
            PathBuf::from("/home/user/vault/.assistant/index.db")
        );
        assert_eq!(
            config.tags_path(),
            PathBuf::from("/home/user/vault/.assistant/tags.json")
        );
    }

    #[test]
    fn test_ensure_assistant_dir() {
        let (_tmp, config) = vault_config();
        config.ensure_assistant_dir().unwrap();
        assert!(config.assistant_dir().is_dir());

        // Idempotent
        config.ensure_assistant_dir().unwrap();
    }
}
