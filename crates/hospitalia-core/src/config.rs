//! Application configuration management.
//!
//! Configuration covers the ledger's prior-balance semantics and currency
//! formats, where exports are written, and the offline cache version and
//! asset list. Every field has a default, so a missing or partial file is
//! fine.
//!
//! Configuration is stored at `~/.config/hospitalia/config.json`.
//! `HOSPITALIA_ASSET_BASE_URL` and `HOSPITALIA_CACHE_VERSION` override the
//! file at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{
    CacheVersion, DEFAULT_ASSETS, DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::export::{DEFAULT_SHEET_NAME, DEFAULT_WORKBOOK_NAME};
use crate::ledger::{LedgerFormat, PriorBalanceMode};
use crate::utils::CurrencyFormat;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "hospitalia";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the asset base URL
pub const ASSET_BASE_URL_ENV: &str = "HOSPITALIA_ASSET_BASE_URL";

/// Environment variable overriding the cache version
pub const CACHE_VERSION_ENV: &str = "HOSPITALIA_CACHE_VERSION";

/// Where the built web bundle is served from (vite preview, app base path).
const DEFAULT_ASSET_BASE_URL: &str = "http://localhost:4173/hospitalia-finance-tracker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub prefix: String,
    /// Part of the deployment contract: changing it evicts every older
    /// store on the next activation.
    pub version: String,
    pub base_url: String,
    pub assets: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CACHE_PREFIX.to_string(),
            version: DEFAULT_CACHE_VERSION.to_string(),
            base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl CacheConfig {
    pub fn version(&self) -> CacheVersion {
        CacheVersion::new(self.prefix.clone(), self.version.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub prior_balance_mode: PriorBalanceMode,
    pub primary_currency: CurrencyFormat,
    pub secondary_currency: CurrencyFormat,
    pub export_dir: Option<PathBuf>,
    pub workbook_name: String,
    pub sheet_name: String,
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prior_balance_mode: PriorBalanceMode::default(),
            primary_currency: CurrencyFormat::ars(),
            secondary_currency: CurrencyFormat::usd(),
            export_dir: None,
            workbook_name: DEFAULT_WORKBOOK_NAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ASSET_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.cache.base_url = url;
        }
        if let Some(version) = lookup(CACHE_VERSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.cache.version = version;
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Root of the offline asset stores.
    pub fn store_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join("stores"))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join("logs"))
    }

    /// Export directory: configured, else Downloads, else the working directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn ledger_format(&self) -> LedgerFormat {
        LedgerFormat::new(self.primary_currency.clone(), self.secondary_currency.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prior_balance_mode, PriorBalanceMode::Overwrite);
        assert_eq!(config.workbook_name, "HospitaliaGB");
        assert_eq!(config.sheet_name, "Datos");
        assert_eq!(config.cache.version().store_name(), "finance-tracker-cache-v1");
        assert_eq!(config.cache.assets.len(), 7);
        assert_eq!(config.cache.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"prior_balance_mode": "accumulate", "cache": {"version": "v2"}}"#,
        )
        .unwrap();
        assert_eq!(config.prior_balance_mode, PriorBalanceMode::Accumulate);
        assert_eq!(config.cache.version().store_name(), "finance-tracker-cache-v2");
        assert_eq!(config.cache.base_url, DEFAULT_ASSET_BASE_URL);
        assert_eq!(config.sheet_name, "Datos");
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ASSET_BASE_URL_ENV => Some("https://example.org/app".to_string()),
            CACHE_VERSION_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.cache.base_url, "https://example.org/app");
        // Blank values are ignored
        assert_eq!(config.cache.version, "v1");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let path = std::env::temp_dir().join("hospitalia-no-such-config.json");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_ledger_format() {
        let format = Config::default().ledger_format();
        assert_eq!(format, LedgerFormat::ars_usd());
    }
}
