//! Configuration management for the library service
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use library::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `LIBRARY__<section>__<key>`
//!
//! Examples:
//! - `LIBRARY__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `LIBRARY__APPLICATION__NAME=libraryApp`
//! - `LIBRARY__PAGINATION__MAX_PAGE_SIZE=500`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/library.toml`.
//! This can be overridden using the `LIBRARY_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{ApplicationConfig, Config, PaginationConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`LIBRARY__*`)
    /// 2. TOML file (default: `config/library.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or a value
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, with the same `.env` and
    /// environment layering as [`Config::load`]
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_path(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
