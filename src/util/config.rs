//! Startup configuration: environment first, then the saved settings, then defaults.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::infra::api::DEFAULT_TTL;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const API_BASE_URL_VAR: &str = "MARINER_API_BASE_URL";
pub const CACHE_TTL_VAR: &str = "MARINER_CACHE_TTL_SECS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a whole number of seconds, got {value}")]
    InvalidTtl { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub cache_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Invalid values are logged and replaced by defaults.
    pub fn load(persisted_base_url: Option<&str>) -> Self {
        match Self::resolve(|key| std::env::var(key).ok(), persisted_base_url) {
            Ok(config) => config,
            Err(err) => {
                warn!("Falling back to default configuration: {err}");
                Self {
                    api_base_url: persisted_base_url
                        .filter(|url| Url::parse(url).is_ok())
                        .unwrap_or(DEFAULT_API_BASE_URL)
                        .to_string(),
                    ..Self::default()
                }
            }
        }
    }

    pub fn resolve<F>(lookup: F, persisted_base_url: Option<&str>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup(API_BASE_URL_VAR).filter(|value| !value.trim().is_empty());
        let api_base_url = match from_env {
            Some(value) => {
                let value = value.trim().to_string();
                Url::parse(&value).map_err(|_| ConfigError::InvalidUrl {
                    var: API_BASE_URL_VAR,
                    value: value.clone(),
                })?;
                value
            }
            None => persisted_base_url
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
        };

        let cache_ttl = match lookup(CACHE_TTL_VAR).filter(|value| !value.trim().is_empty()) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTtl {
                    var: CACHE_TTL_VAR,
                    value,
                })?,
            None => DEFAULT_TTL,
        };

        info!("API base URL: {api_base_url}, cache TTL: {}s", cache_ttl.as_secs());
        Ok(Self {
            api_base_url,
            cache_ttl,
        })
    }
}
