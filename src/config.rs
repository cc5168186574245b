//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::DEFAULT_CACHE_SIZE;
use crate::error::{GridError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of each resolver cache (values and types)
    pub cache_size: usize,
    /// Initial page size of the grid
    pub page_size: usize,
    /// HTTP server port
    pub server_port: u16,
    /// JSON array of rows loaded at startup
    pub dataset_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Resolver cache capacity (default: 25000)
    /// - `PAGE_SIZE` - Initial page size (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATASET_PATH` - Optional JSON file with the initial rows
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_size: parse_var("CACHE_SIZE").unwrap_or(defaults.cache_size),
            page_size: parse_var("PAGE_SIZE").unwrap_or(defaults.page_size),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            dataset_path: env::var_os("DATASET_PATH")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Rejects sizes the cache and paginator would refuse.
    pub fn validate(&self) -> Result<()> {
        if self.cache_size == 0 {
            return Err(GridError::InvalidConfiguration(
                "CACHE_SIZE must be positive".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(GridError::InvalidConfiguration(
                "PAGE_SIZE must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            page_size: 10,
            server_port: 3000,
            dataset_path: None,
        }
    }
}
