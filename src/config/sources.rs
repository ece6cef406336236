use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "LIBRARY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/library.toml";
const ENV_PREFIX: &str = "LIBRARY";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    load_path(default_path())
}

/// Same layering as [`load`] with an explicit TOML file
pub fn load_path(config_path: PathBuf) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    load_from_sources(config_path)
}

/// Path of the TOML file, `LIBRARY_CONFIG` or `config/library.toml`
pub fn default_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from a specific path and the process environment,
/// without reading `.env`
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_layers(config_path, environment())
}

// LIBRARY__APPLICATION__NAME -> application.name
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn load_layers(config_path: PathBuf, environment: Environment) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    let config = builder.add_source(environment).build()?;
    config.try_deserialize()
}
