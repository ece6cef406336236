use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::{PageLimits, page};

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub application: ApplicationConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Directory of the Fjall keyspace holding publishers
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_path: default_data_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/library")
}

fn default_max_body_bytes() -> usize {
    64 * 1024 // 64 KB
}

/// Client application settings used for notification headers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationConfig {
    /// Prefix of the `X-{name}-alert` / `X-{name}-error` / `X-{name}-params` headers
    #[serde(default = "default_application_name")]
    pub name: String,
    /// Send translation keys instead of English messages in alert headers
    #[serde(default = "default_enable_translation")]
    pub enable_translation: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_application_name(),
            enable_translation: default_enable_translation(),
        }
    }
}

fn default_application_name() -> String {
    "libraryApp".to_string()
}

fn default_enable_translation() -> bool {
    true
}

/// Page size bounds for list endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_size: self.default_page_size,
            max_size: self.max_page_size,
        }
    }
}

fn default_page_size() -> u32 {
    page::DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    page::MAX_PAGE_SIZE
}
