//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::models::PageSize;
use crate::services::engine::EngineSettings;

/// Default values used when a variable is unset.
pub mod defaults {
    pub const API_BASE_URL: &str = "https://rickandmortyapi.com/api";
    pub const DEBOUNCE_MS: u64 = 500; // Quiet window after the last filter edit
    pub const PAGE_SIZE: u32 = 20;
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the character API (without the `/character` path)
    pub api_base_url: String,
    /// Debounce window for filter changes
    pub debounce: Duration,
    /// Initial client-side page size
    pub page_size: PageSize,
    /// Optional cap on the number of aggregated records (unbounded when `None`)
    pub max_records: Option<usize>,
    /// Optional per-request timeout (no timeout when `None`)
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: defaults::API_BASE_URL.to_string(),
            debounce: Duration::from_millis(defaults::DEBOUNCE_MS),
            page_size: PageSize::default(),
            max_records: None,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CATALOG_API_BASE_URL`: API base URL (default: https://rickandmortyapi.com/api)
    /// - `CATALOG_DEBOUNCE_MS`: Filter debounce window in milliseconds (default: 500)
    /// - `CATALOG_PAGE_SIZE`: Initial page size, one of 5/10/20/50/100/250 (default: 20)
    /// - `CATALOG_MAX_RECORDS`: Cap on aggregated records (default: unbounded)
    /// - `CATALOG_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("CATALOG_API_BASE_URL")
            .unwrap_or_else(|| defaults::API_BASE_URL.to_string());
        if reqwest::Url::parse(&api_base_url).is_err() {
            return Err(ConfigError::InvalidValue(
                "CATALOG_API_BASE_URL must be a valid URL",
            ));
        }

        let debounce_ms = lookup("CATALOG_DEBOUNCE_MS")
            .unwrap_or_else(|| defaults::DEBOUNCE_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("CATALOG_DEBOUNCE_MS must be a valid number"))?;

        let page_size = lookup("CATALOG_PAGE_SIZE")
            .unwrap_or_else(|| defaults::PAGE_SIZE.to_string())
            .parse::<u32>()
            .ok()
            .and_then(|size| PageSize::try_from(size).ok())
            .ok_or(ConfigError::InvalidValue(
                "CATALOG_PAGE_SIZE must be one of 5, 10, 20, 50, 100, 250",
            ))?;

        let max_records = match lookup("CATALOG_MAX_RECORDS") {
            Some(raw) => Some(parse_positive(&raw).ok_or(ConfigError::InvalidValue(
                "CATALOG_MAX_RECORDS must be a positive number",
            ))?),
            None => None,
        };

        let request_timeout = match lookup("CATALOG_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_positive(&raw).ok_or(
                ConfigError::InvalidValue("CATALOG_REQUEST_TIMEOUT_SECS must be a positive number"),
            )? as u64)),
            None => None,
        };

        Ok(Config {
            api_base_url,
            debounce: Duration::from_millis(debounce_ms),
            page_size,
            max_records,
            request_timeout,
        })
    }

    /// URL of the character collection endpoint.
    pub fn character_endpoint(&self) -> String {
        format!("{}/character", self.api_base_url.trim_end_matches('/'))
    }

    /// Engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            debounce: self.debounce,
            page_size: self.page_size,
            max_records: self.max_records,
        }
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|v| *v > 0)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
