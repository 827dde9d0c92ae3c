//! Configuration management for vaultmind.
//!
//! Supports configuration from:
//! - Command-line arguments (highest priority)
//! - Environment variables
//! - Built-in defaults

mod settings;

pub use settings::Config;
