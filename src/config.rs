//! Environment-driven configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `INVESTED_CATALOG_PATH` | built-in instrument catalog |
//! | `INVESTED_SAVINGS_PATH` | built-in savings accounts |
//! | `INVESTED_PROFILE_PATH` | `invested-stats-storage.json` |
//! | `INVESTED_CHAT_URL` | Gemini REST API |
//! | `INVESTED_CHAT_MODEL` | `gemini-2.5-flash` |
//! | `INVESTED_CHAT_TIMEOUT_MS` | `20000` |

use crate::chat::{api_key_from_env, ChatSettings, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS};
use crate::error::Result;
use crate::profile::{ProfileStore, DEFAULT_PROFILE_PATH};
use crate::ranking::{default_universe, load_catalog, Instrument};
use crate::savings::{default_accounts, load_accounts, SavingsAccount};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub catalog_path: Option<PathBuf>,
    pub savings_path: Option<PathBuf>,
    pub profile_path: PathBuf,
    pub chat: ChatSettings,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let path_var = |name: &str| env::var(name).ok().filter(|s| !s.is_empty()).map(PathBuf::from);

        let timeout_ms: u64 = env::var("INVESTED_CHAT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            catalog_path: path_var("INVESTED_CATALOG_PATH"),
            savings_path: path_var("INVESTED_SAVINGS_PATH"),
            profile_path: path_var("INVESTED_PROFILE_PATH").unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_PATH)),
            chat: ChatSettings {
                endpoint: env::var("INVESTED_CHAT_URL").ok().filter(|s| !s.is_empty()),
                model: env::var("INVESTED_CHAT_MODEL")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key: api_key_from_env(),
                timeout_ms,
            },
        }
    }

    /// Instrument catalog from `catalog_path`, or the built-in one
    pub fn catalog(&self) -> Result<Vec<Instrument>> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(default_universe()),
        }
    }

    pub fn savings_accounts(&self) -> Result<Vec<SavingsAccount>> {
        match &self.savings_path {
            Some(path) => load_accounts(path),
            None => Ok(default_accounts()),
        }
    }

    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(&self.profile_path)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            savings_path: None,
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            chat: ChatSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_builtin_data() {
        let config = EngineConfig::default();
        assert_eq!(config.catalog().unwrap().len(), 6);
        assert_eq!(config.savings_accounts().unwrap().len(), 12);
        assert_eq!(config.profile_store().path(), std::path::Path::new("invested-stats-storage.json"));
        assert_eq!(config.chat.timeout_ms, 20_000);
    }

    #[test]
    fn test_catalog_path_is_loaded() {
        let config = EngineConfig {
            catalog_path: Some(PathBuf::from("data/instruments.csv")),
            savings_path: Some(PathBuf::from("data/savings_accounts.csv")),
            ..Default::default()
        };
        assert_eq!(config.catalog().unwrap(), default_universe());
        assert_eq!(config.savings_accounts().unwrap(), default_accounts());
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let config = EngineConfig {
            catalog_path: Some(PathBuf::from("data/does-not-exist.csv")),
            ..Default::default()
        };
        assert!(config.catalog().is_err());
    }
}
