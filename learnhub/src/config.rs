//! Configuration management for the LearnHub application.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::reducer::DEFAULT_CHECKOUT_DELAY;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,
    /// Catalog source
    pub catalog: CatalogConfig,
    /// Simulated latencies
    pub timing: TimingConfig,
    /// Log filter (trace, debug, info, warn, error or an `EnvFilter` directive)
    pub log_level: String,
}

/// Where the state snapshot lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot file
    pub data_dir: PathBuf,
    /// Key (file stem) of the snapshot
    pub key: String,
}

/// Where the course catalog comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory with `courses.json` and `testimonials.json`; bundled data when unset
    pub dir: Option<PathBuf>,
}

/// Simulated latencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Payment processing time at checkout
    pub checkout_delay: Duration,
    /// Catalog, login and profile latency
    pub loading_delay: Duration,
}

/// Default catalog/login/profile latency
pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_millis(500);

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `LEARNHUB_DATA_DIR` | `.learnhub` |
    /// | `LEARNHUB_STORAGE_KEY` | `appState` |
    /// | `LEARNHUB_CATALOG_DIR` | bundled catalog |
    /// | `LEARNHUB_CHECKOUT_DELAY_MS` | `1500` |
    /// | `LEARNHUB_LOADING_DELAY_MS` | `500` |
    /// | `LEARNHUB_LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_millis)
        };

        Self {
            storage: StorageConfig {
                data_dir: lookup("LEARNHUB_DATA_DIR")
                    .filter(|s| !s.is_empty())
                    .map_or_else(|| PathBuf::from(".learnhub"), PathBuf::from),
                key: lookup("LEARNHUB_STORAGE_KEY")
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            },
            catalog: CatalogConfig {
                dir: lookup("LEARNHUB_CATALOG_DIR")
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from),
            },
            timing: TimingConfig {
                checkout_delay: millis("LEARNHUB_CHECKOUT_DELAY_MS", DEFAULT_CHECKOUT_DELAY),
                loading_delay: millis("LEARNHUB_LOADING_DELAY_MS", DEFAULT_LOADING_DELAY),
            },
            log_level: lookup("LEARNHUB_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, PathBuf::from(".learnhub"));
        assert_eq!(config.storage.key, "appState");
        assert_eq!(config.catalog.dir, None);
        assert_eq!(config.timing.checkout_delay, Duration::from_millis(1500));
        assert_eq!(config.timing.loading_delay, Duration::from_millis(500));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LEARNHUB_DATA_DIR", "/tmp/learnhub"),
            ("LEARNHUB_CATALOG_DIR", "/srv/catalog"),
            ("LEARNHUB_CHECKOUT_DELAY_MS", "0"),
            ("LEARNHUB_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(ToString::to_string));
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/learnhub"));
        assert_eq!(config.catalog.dir, Some(PathBuf::from("/srv/catalog")));
        assert_eq!(config.timing.checkout_delay, Duration::ZERO);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn ignores_unparseable_numbers() {
        let config = Config::from_lookup(|key| {
            (key == "LEARNHUB_LOADING_DELAY_MS").then(|| "soon".to_string())
        });
        assert_eq!(config.timing.loading_delay, DEFAULT_LOADING_DELAY);
    }
}
