use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com";
pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: DEFAULT_COINGECKO_URL.to_string(),
            }),
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn coingecko_url(&self) -> &str {
        self.coingecko
            .as_ref()
            .map_or(DEFAULT_COINGECKO_URL, |p| &p.base_url)
    }

    pub fn exchange_rate_url(&self) -> &str {
        self.exchange_rate
            .as_ref()
            .map_or(DEFAULT_EXCHANGE_RATE_URL, |p| &p.base_url)
    }
}

/// Additional crypto assets on top of the built-in table.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CryptoConfig {
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Ticker to CoinGecko id overrides. Listed tickers count as crypto.
    #[serde(default)]
    pub ids: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub crypto: CryptoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            crypto: CryptoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from `path` when given, otherwise from the default
    /// location if a file exists there. Falls back to built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let default_path = Self::default_config_path()?;
        if default_path.exists() {
            debug!("Loading default config");
            Self::load_from_path(&default_path)
        } else {
            debug!("No config file found, using built-in defaults");
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
