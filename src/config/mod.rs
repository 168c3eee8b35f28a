// SPDX-License-Identifier: MPL-2.0
//! Client configuration loaded from `folio_sync.toml`.
//!
//! # Configuration Sections
//!
//! - `[remote]` - JSON host and overlapping-fetch policy
//! - `[persistence]` - Storage key and rehydration gate timeout
//! - `[selectors]` - Parameterized selector cache size
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `FOLIO_SYNC_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use folio_sync::config;
//!
//! let (mut config, _warning) = config::load();
//! config.remote.base_url = "https://cdn.example.com/portfolio".to_string();
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use crate::store::SettlementPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "folio_sync.toml";

/// Where the portfolio documents come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How overlapping fetches of one resource are reconciled. Defaults to
    /// `latest-dispatched`, which drops responses from superseded requests;
    /// set `last-settled` to let whichever response arrives last win.
    #[serde(default)]
    pub settlement_policy: SettlementPolicy,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            settlement_policy: SettlementPolicy::default(),
        }
    }
}

/// Settings persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistenceConfig {
    #[serde(default = "default_root_key")]
    pub root_key: String,

    /// Opens the render gate with defaults if rehydration takes longer.
    /// Absent means wait for rehydration however long it takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehydrate_timeout_ms: Option<u64>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            root_key: default_root_key(),
            rehydrate_timeout_ms: None,
        }
    }
}

impl PersistenceConfig {
    /// Gate timeout, clamped to [`MAX_REHYDRATE_TIMEOUT_MS`].
    #[must_use]
    pub fn rehydrate_timeout(&self) -> Option<Duration> {
        self.rehydrate_timeout_ms
            .map(|ms| Duration::from_millis(ms.min(MAX_REHYDRATE_TIMEOUT_MS)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Entries kept per parameterized selector. Read through
    /// [`SelectorConfig::cache_capacity`], which bounds it.
    #[serde(default = "default_keyed_cache_capacity")]
    pub keyed_cache_capacity: usize,
}

impl SelectorConfig {
    /// Keyed cache capacity, clamped to `1..=`[`MAX_KEYED_CACHE_CAPACITY`].
    #[must_use]
    pub fn cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.keyed_cache_capacity.min(MAX_KEYED_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            keyed_cache_capacity: DEFAULT_KEYED_CACHE_CAPACITY,
        }
    }
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_root_key() -> String {
    DEFAULT_ROOT_KEY.to_string()
}

fn default_keyed_cache_capacity() -> usize {
    DEFAULT_KEYED_CACHE_CAPACITY
}

// =============================================================================
// Load / Save
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
#[must_use]
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
#[must_use]
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }

    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "config unreadable; using defaults");
            (Config::default(), Some("config-load-error".to_string()))
        }
    }
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Saves the configuration to the default path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            remote: RemoteConfig {
                base_url: "https://cdn.example.com/data".into(),
                settlement_policy: SettlementPolicy::LastSettled,
            },
            persistence: PersistenceConfig {
                root_key: "persist:test".into(),
                rehydrate_timeout_ms: Some(250),
            },
            selectors: SelectorConfig {
                keyed_cache_capacity: 4,
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn load_with_override_falls_back_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[remote\n").expect("write");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("config-load-error"));
    }

    #[test]
    fn missing_file_loads_defaults_silently() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "[remote]\nsettlement_policy = \"last-settled\"\n").expect("write");

        let config = load_from_path(&path).expect("load");
        assert_eq!(config.remote.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.remote.settlement_policy, SettlementPolicy::LastSettled);
        assert_eq!(config.persistence.root_key, DEFAULT_ROOT_KEY);
        assert_eq!(config.selectors.keyed_cache_capacity, DEFAULT_KEYED_CACHE_CAPACITY);
    }

    #[test]
    fn rehydrate_timeout_is_clamped() {
        let persistence = PersistenceConfig {
            rehydrate_timeout_ms: Some(u64::MAX),
            ..PersistenceConfig::default()
        };
        assert_eq!(
            persistence.rehydrate_timeout(),
            Some(Duration::from_millis(MAX_REHYDRATE_TIMEOUT_MS))
        );
        assert_eq!(PersistenceConfig::default().rehydrate_timeout(), None);
    }

    #[test]
    fn keyed_cache_capacity_is_clamped() {
        let config: Config =
            toml::from_str("[selectors]\nkeyed_cache_capacity = 9223372036854775807\n")
                .expect("parse");
        assert_eq!(config.selectors.cache_capacity().get(), MAX_KEYED_CACHE_CAPACITY);

        let zero = SelectorConfig {
            keyed_cache_capacity: 0,
        };
        assert_eq!(zero.cache_capacity(), NonZeroUsize::MIN);
        assert_eq!(
            SelectorConfig::default().cache_capacity().get(),
            DEFAULT_KEYED_CACHE_CAPACITY
        );
    }
}
