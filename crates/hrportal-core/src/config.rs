//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which selects the storage backend, the session lifetime, the optional
//! code attempt limit, and remembers the last email used to log in.
//!
//! Configuration is stored at `~/.config/hrportal/config.json`
//! (`HRPORTAL_CONFIG_DIR` overrides the directory). Session state lives in
//! `~/.cache/hrportal` (`HRPORTAL_STATE_DIR` overrides).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::credentials::DEFAULT_TOKEN_LIFETIME_MINUTES;
use crate::auth::{SessionStoreOptions, StaticIdentityProvider};
use crate::storage::{DurableStorage, FileStorage, KeyringStorage, MemoryStorage};

/// Application name used for config/state directory paths
const APP_NAME: &str = "hrportal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Longest session a config may ask for (one year)
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "HRPORTAL_CONFIG_DIR";

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "HRPORTAL_STATE_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageBackend,
    pub session_ttl_minutes: i64,
    pub max_code_attempts: Option<u32>,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            session_ttl_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
            max_code_attempts: None,
            last_email: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
                .join(APP_NAME),
        };
        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Directory holding the persisted session and logs.
    pub fn state_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(STATE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Token lifetime, clamped to between one minute and one year.
    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(self.session_ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES))
    }

    pub fn session_options(&self) -> SessionStoreOptions {
        SessionStoreOptions {
            max_code_attempts: self.max_code_attempts,
        }
    }

    pub fn identity_provider(&self) -> StaticIdentityProvider {
        StaticIdentityProvider::new(self.session_ttl())
    }

    /// Open the configured storage backend.
    pub fn open_storage(&self) -> Result<Box<dyn DurableStorage>> {
        Ok(match self.storage {
            StorageBackend::File => {
                let dir = self.state_dir()?;
                Box::new(FileStorage::open(&dir).context("Failed to open session file")?)
            }
            StorageBackend::Keyring => Box::new(KeyringStorage::default()),
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::STATIC_CODE;
    use crate::auth::{Claims, IdentityProvider};

    #[test]
    fn test_missing_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.session_ttl(), Duration::minutes(480));
        assert_eq!(config.session_options(), SessionStoreOptions::default());
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            storage: StorageBackend::Keyring,
            session_ttl_minutes: 15,
            max_code_attempts: Some(5),
            last_email: Some("admin@test.com".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"storage": "memory"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.session_ttl_minutes, DEFAULT_TOKEN_LIFETIME_MINUTES);
    }

    #[test]
    fn test_non_positive_ttl_is_clamped() {
        let config = Config {
            session_ttl_minutes: 0,
            ..Config::default()
        };
        assert_eq!(config.session_ttl(), Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_clamped_to_a_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        for ttl in [i64::MAX, 1_000_000_000_000] {
            std::fs::write(&path, format!(r#"{{"session_ttl_minutes": {}}}"#, ttl)).unwrap();

            let config = Config::load_from(&path).unwrap();
            assert_eq!(config.session_ttl(), Duration::minutes(MAX_SESSION_TTL_MINUTES));

            let token = config
                .identity_provider()
                .verify_code("admin@test.com", STATIC_CODE)
                .await
                .unwrap();
            let claims = Claims::decode(&token).unwrap();
            assert_eq!(claims.exp - claims.iat, MAX_SESSION_TTL_MINUTES * 60);
        }
    }

    #[test]
    fn test_state_dir_env_override() {
        let dir = tempfile::tempdir().unwrap();
        temp_env::with_var(STATE_DIR_ENV, Some(dir.path()), || {
            let config = Config::default();
            assert_eq!(config.state_dir().unwrap(), dir.path());

            let mut storage = config.open_storage().unwrap();
            storage.set("token", "t").unwrap();
            assert!(dir.path().join("session.json").exists());
        });
    }

    #[test]
    fn test_config_dir_env_override() {
        let dir = tempfile::tempdir().unwrap();
        temp_env::with_var(CONFIG_DIR_ENV, Some(dir.path()), || {
            let config = Config {
                last_email: Some("employee@test.com".to_string()),
                ..Config::default()
            };
            config.save().unwrap();
            assert!(dir.path().join(CONFIG_FILE).exists());
            assert_eq!(Config::load().unwrap(), config);
        });
    }
}
